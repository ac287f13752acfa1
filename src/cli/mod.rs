//! CLI module for model archival commands.
//!
//! Arguments are parsed by hand; every command returns a process exit code.
//!
//! ## Usage
//!
//! ```bash
//! model-archival-cli archive runs/tagger --weights best.th --file vocab=/data/glove.txt
//! model-archival-cli restore runs/tagger/model.tar.gz --overrides '{"trainer.lr": 0.1}'
//! model-archival-cli inspect runs/tagger/model.tar.gz
//! model-archival-cli config show
//! ```

pub mod archive_cmd;
pub mod config_cmd;
pub mod inspect_cmd;
pub mod restore_cmd;

use std::path::PathBuf;

/// Command completed.
pub const EXIT_SUCCESS: i32 = 0;
/// Command ran and the operation failed.
pub const EXIT_FAILURE: i32 = 1;
/// Bad arguments or configuration.
pub const EXIT_USAGE: i32 = 2;

/// Remove a global `--config FILE` option from `args`, wherever it appears.
pub fn split_config_flag(args: Vec<String>) -> Result<(Option<PathBuf>, Vec<String>), String> {
    let mut config = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().ok_or("Missing value for --config")?;
            config = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }
    Ok((config, rest))
}

/// Fetch the value following option `name` at `args[i]`.
pub(crate) fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_config_flag() {
        let (config, rest) =
            split_config_flag(strings(&["restore", "--config", "a.toml", "m.tar.gz"])).unwrap();
        assert_eq!(config, Some(PathBuf::from("a.toml")));
        assert_eq!(rest, strings(&["restore", "m.tar.gz"]));
    }

    #[test]
    fn test_split_config_flag_absent() {
        let (config, rest) = split_config_flag(strings(&["inspect", "m.tar.gz"])).unwrap();
        assert_eq!(config, None);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_split_config_flag_missing_value() {
        assert!(split_config_flag(strings(&["archive", "--config"])).is_err());
    }

    #[test]
    fn test_option_value() {
        let args = strings(&["--weights", "best.th"]);
        assert_eq!(option_value(&args, 0, "--weights").unwrap(), "best.th");
        assert!(option_value(&args, 1, "--weights").is_err());
    }
}
