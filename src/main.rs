//! Model archival CLI entry point.
//!
//! ## CLI Subcommands
//!
//! - `archive` - Pack a serialization directory into `model.tar.gz`
//! - `restore` - Restore an archive and print the loaded model and config
//! - `inspect` - List archive entries
//! - `config`  - Show effective or default configuration

use std::process::ExitCode;

use model_archival::cli::{
    archive_cmd, config_cmd, inspect_cmd, restore_cmd, split_config_flag, EXIT_USAGE,
};
use model_archival::config::{self as archival_config, ArchivalConfig};
use model_archival::telemetry::init_logging;

fn main() -> ExitCode {
    let (config_path, args) = match split_config_flag(std::env::args().collect()) {
        Ok(split) => split,
        Err(e) => {
            eprintln!("{}", e);
            return exit(EXIT_USAGE);
        }
    };
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let rest = args.get(2..).unwrap_or(&[]);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(code) => return exit(code),
    };

    match command {
        "archive" | "restore" | "inspect" => {
            if let Err(e) = init_logging(&config.log) {
                eprintln!("Logging disabled: {}", e);
            }
        }
        _ => {}
    }

    match command {
        "archive" => exit(archive_cmd::run(rest, &config)),
        "restore" => exit(restore_cmd::run(rest, &config)),
        "inspect" => exit(inspect_cmd::run(rest)),
        "config" => {
            let subcommand = rest.first().map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show(&config);
                    ExitCode::SUCCESS
                }
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    exit(EXIT_USAGE)
                }
            }
        }
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = rest.first() {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("model-archival {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            exit(EXIT_USAGE)
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}

fn load_config(path: Option<std::path::PathBuf>) -> Result<ArchivalConfig, i32> {
    match path {
        Some(path) => archival_config::load_file(&path).map_err(|e| {
            eprintln!("Configuration error: {}", e);
            EXIT_USAGE
        }),
        None => Ok(archival_config::load()),
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "model-archival - package and restore trained models v{}

USAGE:
    model-archival-cli [--config FILE] <COMMAND> [OPTIONS]

COMMANDS:
    archive      Pack a serialization directory into model.tar.gz
    restore      Restore an archive and print the loaded model and config
    inspect      List the entries of an archive
    config       Show configuration (show, defaults)
    version      Show version information
    help         Show this help message

OPTIONS:
    --config FILE  Load settings from a TOML file (env vars still apply on top)
    -h, --help     Show help for command
    -V, --version  Show version information

ENVIRONMENT:
    MODEL_ARCHIVAL_WEIGHTS     Weights file archived by default (best.th)
    MODEL_ARCHIVAL_TEMP_DIR    Root for extraction directories
    MODEL_ARCHIVAL_CACHE_DIR   Cache consulted for remote archive URIs
    MODEL_ARCHIVAL_LOG_FORMAT  json or pretty
    MODEL_ARCHIVAL_LOG_LEVEL   Log filter (info, debug, model_archival=trace)
    MODEL_ARCHIVAL_LOG_FILE    Write logs to a file instead of stderr

EXIT CODES:
    0  Success
    1  Operation failed
    2  Usage or configuration error
",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "archive" => {
            eprintln!(
                "model-archival-cli archive - Pack a serialization directory

USAGE:
    model-archival-cli archive <SERIALIZATION_DIR> [OPTIONS]

OPTIONS:
    --weights NAME     Weights file inside the directory (default: best.th)
    --file KEY=PATH    Auxiliary file to embed; repeatable. KEY is the config
                       key that will point at the extracted copy on restore.

DESCRIPTION:
    Writes SERIALIZATION_DIR/model.tar.gz containing model_params.json (as
    config.json), the weights (as weights.th) and the vocabulary directory.
    Fails without writing an archive if weights, config or vocabulary are
    missing.

EXAMPLES:
    model-archival-cli archive runs/tagger
    model-archival-cli archive runs/tagger --weights model_state_epoch_4.th
    model-archival-cli archive runs/tagger --file model.embedder.pretrained_file=/data/glove.txt
"
            );
        }
        "restore" => {
            eprintln!(
                "model-archival-cli restore - Restore an archive

USAGE:
    model-archival-cli restore <ARCHIVE> [OPTIONS]

OPTIONS:
    --cuda-device N    Device index; negative means CPU (default: -1)
    --device D         cpu, cuda or cuda:N
    --overrides TEXT   JSON object applied on top of the archived config

DESCRIPTION:
    ARCHIVE is a local path, a file:// URI, or an http(s)/s3 URI already
    present in the cache directory. Overrides win over auxiliary file
    substitutions recorded in the archive.

EXAMPLES:
    model-archival-cli restore runs/tagger/model.tar.gz
    model-archival-cli restore runs/tagger/model.tar.gz --overrides '{{\"model.dropout\": 0.0}}'
"
            );
        }
        "inspect" => {
            eprintln!(
                "model-archival-cli inspect - List archive entries

USAGE:
    model-archival-cli inspect <ARCHIVE>
"
            );
        }
        "config" => {
            eprintln!(
                "model-archival-cli config - Show configuration

USAGE:
    model-archival-cli config <SUBCOMMAND>

SUBCOMMANDS:
    show           Show effective configuration
    defaults       Show default configuration
"
            );
        }
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'model-archival-cli help' for general usage.",
                command
            );
        }
    }
}
