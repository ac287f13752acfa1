//! Model construction for restored archives.
//!
//! The archive restorer does not know how to build a model; it hands the
//! merged configuration and extracted artifacts to a [`LoadModel`]
//! implementation. [`PackagedModelLoader`] is the built-in one.

mod device;
mod loader;
pub mod vocabulary;

pub use device::Device;
pub use loader::{LoadError, LoadModel, ModelWeights, PackagedModel, PackagedModelLoader};
pub use vocabulary::{Vocabulary, VOCABULARY_DIR};
