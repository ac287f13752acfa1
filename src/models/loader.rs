//! Model construction from restored archive contents.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use super::device::Device;
use super::vocabulary::{Vocabulary, VOCABULARY_DIR};
use crate::params::{Params, ParamsError};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Model file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid model format: {0}")]
    InvalidFormat(String),

    #[error("Device not available: {0}")]
    DeviceUnavailable(Device),

    #[error("Model config error: {0}")]
    Config(#[from] ParamsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds a model instance from configuration and extracted artifacts.
///
/// `config` is handed over by value: implementations are free to pop keys
/// from it while constructing the model.
pub trait LoadModel {
    type Model;

    fn load(
        &self,
        config: Params,
        weights_file: &Path,
        serialization_dir: &Path,
        device: Device,
    ) -> Result<Self::Model, LoadError>;
}

/// Serialized model parameters held in memory.
#[derive(Debug, Clone)]
pub struct ModelWeights {
    bytes: Vec<u8>,
    sha256: String,
}

impl ModelWeights {
    /// Read a weights file fully into memory.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(LoadError::InvalidFormat(format!(
                "weights file {} is empty",
                path.display()
            )));
        }
        let sha256 = hex::encode(Sha256::digest(&bytes));
        Ok(Self { bytes, sha256 })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex-encoded SHA-256 of the weights.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

/// A model restored by [`PackagedModelLoader`].
#[derive(Debug, Clone)]
pub struct PackagedModel {
    /// Value of `model.type` in the config, `"unknown"` if absent.
    pub model_type: String,
    pub weights: ModelWeights,
    pub vocabulary: Vocabulary,
    pub device: Device,
    /// Model section keys left after `type` was consumed.
    pub params: Params,
}

/// Loads weights and vocabulary without interpreting the model architecture.
///
/// Only CPU placement is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagedModelLoader;

impl LoadModel for PackagedModelLoader {
    type Model = PackagedModel;

    fn load(
        &self,
        mut config: Params,
        weights_file: &Path,
        serialization_dir: &Path,
        device: Device,
    ) -> Result<PackagedModel, LoadError> {
        if !device.is_cpu() {
            return Err(LoadError::DeviceUnavailable(device));
        }

        let mut params = if config.contains("model") {
            config.pop_params("model")?
        } else {
            Params::default()
        };
        let model_type = if params.contains("type") {
            params.pop_str("type")?
        } else {
            "unknown".to_string()
        };

        let weights = ModelWeights::read(weights_file)?;
        let vocabulary = Vocabulary::from_dir(&serialization_dir.join(VOCABULARY_DIR))?;

        info!(
            model_type = %model_type,
            weights_bytes = weights.len(),
            namespaces = vocabulary.namespaces().count(),
            device = %device,
            "model loaded"
        );

        Ok(PackagedModel {
            model_type,
            weights,
            vocabulary,
            device,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_artifacts(dir: &Path) -> PathBuf {
        let weights = dir.join("weights.th");
        std::fs::write(&weights, b"\x00\x01\x02weights").unwrap();
        std::fs::create_dir_all(dir.join(VOCABULARY_DIR)).unwrap();
        std::fs::write(dir.join(VOCABULARY_DIR).join("tokens.txt"), "a\nb\n").unwrap();
        weights
    }

    #[test]
    fn test_loads_model_type_weights_and_vocab() {
        let dir = tempfile::tempdir().unwrap();
        let weights = write_artifacts(dir.path());
        let config = Params::parse(r#"{"model": {"type": "tagger", "dim": 4}}"#, "").unwrap();

        let model = PackagedModelLoader
            .load(config, &weights, dir.path(), Device::Cpu)
            .unwrap();
        assert_eq!(model.model_type, "tagger");
        assert_eq!(model.weights.as_bytes(), b"\x00\x01\x02weights");
        assert_eq!(model.weights.sha256().len(), 64);
        assert_eq!(model.vocabulary.size("tokens"), 2);
        assert_eq!(model.params.get("dim"), Some(&json!(4)));
    }

    #[test]
    fn test_missing_model_section_is_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let weights = write_artifacts(dir.path());
        let config = Params::parse(r#"{"a": 1}"#, "").unwrap();

        let model = PackagedModelLoader
            .load(config, &weights, dir.path(), Device::Cpu)
            .unwrap();
        assert_eq!(model.model_type, "unknown");
        assert!(model.params.is_empty());
    }

    #[test]
    fn test_cuda_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let weights = write_artifacts(dir.path());
        let err = PackagedModelLoader
            .load(Params::default(), &weights, dir.path(), Device::Cuda(0))
            .unwrap_err();
        assert!(matches!(err, LoadError::DeviceUnavailable(Device::Cuda(0))));
    }

    #[test]
    fn test_empty_weights_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let empty = dir.path().join("empty.th");
        std::fs::write(&empty, b"").unwrap();
        let err = PackagedModelLoader
            .load(Params::default(), &empty, dir.path(), Device::Cpu)
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat(_)));
    }

    #[test]
    fn test_non_string_model_type_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let weights = write_artifacts(dir.path());
        let config = Params::parse(r#"{"model": {"type": 7}}"#, "").unwrap();
        let err = PackagedModelLoader
            .load(config, &weights, dir.path(), Device::Cpu)
            .unwrap_err();
        assert!(matches!(err, LoadError::Config(ParamsError::TypeMismatch { .. })));
    }
}
