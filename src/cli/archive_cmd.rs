//! `archive` subcommand: pack a serialization directory.

use std::path::PathBuf;

use super::{option_value, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use crate::archive::{archive_model, FilesToArchive};
use crate::config::ArchivalConfig;

/// Parsed `archive` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArgs {
    pub serialization_dir: PathBuf,
    pub weights: Option<String>,
    pub files: FilesToArchive,
}

/// Parse `<SERIALIZATION_DIR> [--weights NAME] [--file KEY=PATH]...`.
pub fn parse_args(args: &[String]) -> Result<ArchiveArgs, String> {
    let mut serialization_dir = None;
    let mut weights = None;
    let mut files = FilesToArchive::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--weights" => {
                weights = Some(option_value(args, i, "--weights")?.to_string());
                i += 2;
            }
            "--file" => {
                let (key, path) = parse_file_arg(option_value(args, i, "--file")?)?;
                if files.insert(key.clone(), path).is_some() {
                    return Err(format!("Duplicate auxiliary key: {}", key));
                }
                i += 2;
            }
            arg if arg.starts_with("--") => return Err(format!("Unknown argument: {}", arg)),
            arg => {
                if serialization_dir.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                serialization_dir = Some(PathBuf::from(arg));
                i += 1;
            }
        }
    }

    let serialization_dir = serialization_dir.ok_or(
        "Usage: model-archival-cli archive <SERIALIZATION_DIR> [--weights NAME] [--file KEY=PATH]...",
    )?;
    Ok(ArchiveArgs {
        serialization_dir,
        weights,
        files,
    })
}

/// Split `KEY=PATH`.
fn parse_file_arg(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((key, path)) if !key.is_empty() && !path.is_empty() => {
            Ok((key.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("Expected KEY=PATH, got: {}", arg)),
    }
}

/// Run `archive`. Returns the exit code.
pub fn run(args: &[String], config: &ArchivalConfig) -> i32 {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_USAGE;
        }
    };
    let weights = parsed.weights.as_deref().unwrap_or(&config.default_weights);

    match archive_model(&parsed.serialization_dir, weights, &parsed.files) {
        Ok(path) => {
            println!("{}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}
