//! Config CLI subcommands: show, defaults.

use crate::config::ArchivalConfig;

/// Print effective config as key-value pairs to stdout.
pub fn run_show(config: &ArchivalConfig) {
    print_config(config);
}

/// Print default config values (no env or file overrides) to stdout.
pub fn run_defaults() {
    print_config(&ArchivalConfig::default());
}

fn print_config(config: &ArchivalConfig) {
    for (key, value) in config.effective() {
        println!("{}={}", key, value);
    }
}
