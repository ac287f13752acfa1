//! `restore` subcommand: restore an archive and print what was loaded.

use super::{option_value, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use crate::archive::ArchiveRestorer;
use crate::config::ArchivalConfig;
use crate::models::{Device, PackagedModel, PackagedModelLoader};
use crate::params::Params;

/// Parsed `restore` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreArgs {
    pub archive: String,
    pub device: Device,
    pub overrides: String,
}

/// Parse `<ARCHIVE> [--cuda-device N | --device D] [--overrides TEXT]`.
pub fn parse_args(args: &[String]) -> Result<RestoreArgs, String> {
    let mut archive = None;
    let mut device = Device::Cpu;
    let mut overrides = String::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--cuda-device" => {
                let value = option_value(args, i, "--cuda-device")?;
                let index = value
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid --cuda-device: {}", value))?;
                device = Device::from_cuda_index(index);
                i += 2;
            }
            "--device" => {
                device = option_value(args, i, "--device")?.parse()?;
                i += 2;
            }
            "--overrides" => {
                overrides = option_value(args, i, "--overrides")?.to_string();
                i += 2;
            }
            arg if arg.starts_with("--") => return Err(format!("Unknown argument: {}", arg)),
            arg => {
                if archive.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                archive = Some(arg.to_string());
                i += 1;
            }
        }
    }

    let archive = archive.ok_or(
        "Usage: model-archival-cli restore <ARCHIVE> [--cuda-device N] [--overrides TEXT]",
    )?;
    Ok(RestoreArgs {
        archive,
        device,
        overrides,
    })
}

/// Run `restore`. Returns the exit code.
pub fn run(args: &[String], config: &ArchivalConfig) -> i32 {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_USAGE;
        }
    };

    let restorer = ArchiveRestorer::from_config(config, PackagedModelLoader);
    match restorer.restore(&parsed.archive, parsed.device, &parsed.overrides) {
        Ok(archive) => {
            print_summary(&archive.model, &archive.config);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn print_summary(model: &PackagedModel, config: &Params) {
    println!("Model type:    {}", model.model_type);
    println!("Device:        {}", model.device);
    println!("Weights:       {} bytes (sha256 {})", model.weights.len(), model.weights.sha256());
    for namespace in model.vocabulary.namespaces() {
        println!(
            "Vocabulary:    {:<20} {:>8} tokens",
            namespace,
            model.vocabulary.size(namespace)
        );
    }
    println!("Config:");
    println!("{}", config.to_pretty_json());
}
