//! Runtime configuration from environment variables and TOML files.
//!
//! [`load`] reads `MODEL_ARCHIVAL_*` environment variables with sensible
//! defaults and never fails: invalid values fall back to defaults.
//! [`load_file`] reads a TOML file first and layers the environment on top.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `MODEL_ARCHIVAL_WEIGHTS` | `best.th` | Weights file name archived by default |
//! | `MODEL_ARCHIVAL_TEMP_DIR` | system temp | Root for extraction directories |
//! | `MODEL_ARCHIVAL_CACHE_DIR` | `$HOME/.cache/model-archival` | Remote archive cache |
//! | `MODEL_ARCHIVAL_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `MODEL_ARCHIVAL_LOG_LEVEL` | `info` | Log filter directive |
//! | `MODEL_ARCHIVAL_LOG_FILE` | unset | Log file (stderr if unset) |

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::archive::DEFAULT_WEIGHTS;
use crate::telemetry::{LogConfig, LogFormat};

const ENV_WEIGHTS: &str = "MODEL_ARCHIVAL_WEIGHTS";
const ENV_TEMP_DIR: &str = "MODEL_ARCHIVAL_TEMP_DIR";
const ENV_CACHE_DIR: &str = "MODEL_ARCHIVAL_CACHE_DIR";
const ENV_LOG_FORMAT: &str = "MODEL_ARCHIVAL_LOG_FORMAT";
const ENV_LOG_LEVEL: &str = "MODEL_ARCHIVAL_LOG_LEVEL";
const ENV_LOG_FILE: &str = "MODEL_ARCHIVAL_LOG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// All archival settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivalConfig {
    /// Weights file name used by `archive` when none is given.
    pub default_weights: String,
    /// Root for extraction directories; system temp dir if None.
    pub temp_dir: Option<PathBuf>,
    /// Cache directory consulted for remote archive URIs.
    pub cache_dir: PathBuf,
    pub log: LogConfig,
}

impl Default for ArchivalConfig {
    fn default() -> Self {
        Self {
            default_weights: DEFAULT_WEIGHTS.to_string(),
            temp_dir: None,
            cache_dir: default_cache_dir(),
            log: LogConfig::default(),
        }
    }
}

/// On-disk TOML layout. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    weights: Option<String>,
    temp_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    log_format: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

fn default_cache_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".cache")
        .join("model-archival")
}

/// Non-empty env var value.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn apply_env(config: &mut ArchivalConfig) {
    if let Some(weights) = env_value(ENV_WEIGHTS) {
        config.default_weights = weights;
    }
    if let Some(dir) = env_value(ENV_TEMP_DIR) {
        config.temp_dir = Some(PathBuf::from(dir));
    }
    if let Some(dir) = env_value(ENV_CACHE_DIR) {
        config.cache_dir = PathBuf::from(dir);
    }
    if let Some(format) = env_value(ENV_LOG_FORMAT).and_then(|f| f.parse::<LogFormat>().ok()) {
        config.log.format = format;
    }
    if let Some(level) = env_value(ENV_LOG_LEVEL) {
        config.log.level = level;
    }
    if let Some(file) = env_value(ENV_LOG_FILE) {
        config.log.output_path = Some(PathBuf::from(file));
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to defaults without panicking.
pub fn load() -> ArchivalConfig {
    let mut config = ArchivalConfig::default();
    apply_env(&mut config);
    config
}

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_file(path: &Path) -> Result<ArchivalConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = from_toml(&text)?;
    apply_env(&mut config);
    Ok(config)
}

fn from_toml(text: &str) -> Result<ArchivalConfig, ConfigError> {
    let file: FileConfig = toml::from_str(text)?;
    let mut config = ArchivalConfig::default();

    if let Some(weights) = file.weights {
        if weights.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "weights",
                value: weights,
            });
        }
        config.default_weights = weights;
    }
    if let Some(dir) = file.temp_dir {
        config.temp_dir = Some(dir);
    }
    if let Some(dir) = file.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(format) = file.log_format {
        config.log.format = format.parse().map_err(|_| ConfigError::InvalidValue {
            key: "log_format",
            value: format.clone(),
        })?;
    }
    if let Some(level) = file.log_level {
        config.log.level = level;
    }
    if let Some(path) = file.log_file {
        config.log.output_path = Some(path);
    }
    Ok(config)
}

impl ArchivalConfig {
    /// Effective values as `(env var, value)` pairs, for display.
    pub fn effective(&self) -> Vec<(&'static str, String)> {
        let format = match self.log.format {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        vec![
            (ENV_WEIGHTS, self.default_weights.clone()),
            (
                ENV_TEMP_DIR,
                self.temp_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| std::env::temp_dir().display().to_string()),
            ),
            (ENV_CACHE_DIR, self.cache_dir.display().to_string()),
            (ENV_LOG_FORMAT, format.to_string()),
            (ENV_LOG_LEVEL, self.log.level.clone()),
            (
                ENV_LOG_FILE,
                self.log
                    .output_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize env-mutating tests to avoid cross-test pollution.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        ENV_WEIGHTS,
        ENV_TEMP_DIR,
        ENV_CACHE_DIR,
        ENV_LOG_FORMAT,
        ENV_LOG_LEVEL,
        ENV_LOG_FILE,
    ];

    fn clear_env_vars() {
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
    }

    #[test]
    fn test_defaults_are_sensible() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        let cfg = load();
        assert_eq!(cfg.default_weights, "best.th");
        assert_eq!(cfg.temp_dir, None);
        assert!(cfg.cache_dir.ends_with("model-archival"));
        assert_eq!(cfg.log, LogConfig::default());
    }

    #[test]
    fn test_env_vars_override_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var(ENV_WEIGHTS, "model_state_epoch_3.th");
        std::env::set_var(ENV_TEMP_DIR, "/scratch");
        std::env::set_var(ENV_CACHE_DIR, "/cache");
        std::env::set_var(ENV_LOG_FORMAT, "pretty");
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        let cfg = load();
        assert_eq!(cfg.default_weights, "model_state_epoch_3.th");
        assert_eq!(cfg.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(cfg.cache_dir, PathBuf::from("/cache"));
        assert_eq!(cfg.log.format, LogFormat::Pretty);
        assert_eq!(cfg.log.level, "debug");
        clear_env_vars();
    }

    #[test]
    fn test_invalid_env_falls_back_to_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var(ENV_LOG_FORMAT, "xml");
        std::env::set_var(ENV_WEIGHTS, "   ");
        let cfg = load();
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert_eq!(cfg.default_weights, "best.th");
        clear_env_vars();
    }

    #[test]
    fn test_toml_file_then_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archival.toml");
        std::fs::write(
            &path,
            "weights = \"last.th\"\ncache_dir = \"/from/file\"\nlog_format = \"pretty\"\n",
        )
        .unwrap();

        let cfg = load_file(&path).unwrap();
        assert_eq!(cfg.default_weights, "last.th");
        assert_eq!(cfg.cache_dir, PathBuf::from("/from/file"));
        assert_eq!(cfg.log.format, LogFormat::Pretty);

        std::env::set_var(ENV_CACHE_DIR, "/from/env");
        let cfg = load_file(&path).unwrap();
        assert_eq!(cfg.cache_dir, PathBuf::from("/from/env"));
        clear_env_vars();
    }

    #[test]
    fn test_toml_rejects_unknown_keys_and_bad_values() {
        assert!(matches!(from_toml("colour = \"blue\""), Err(ConfigError::Toml(_))));
        assert!(matches!(
            from_toml("log_format = \"xml\""),
            Err(ConfigError::InvalidValue { key: "log_format", .. })
        ));
        assert!(matches!(
            from_toml("weights = \"\""),
            Err(ConfigError::InvalidValue { key: "weights", .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_file(Path::new("/no/such/archival.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_effective_lists_every_variable() {
        let cfg = ArchivalConfig::default();
        let keys: Vec<_> = cfg.effective().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ENV_KEYS.to_vec());
    }
}
