//! Experiment configuration values.
//!
//! A [`Params`] holds a JSON object describing how a model was built. Loading
//! applies an override layer on top of the file contents; consumers then `pop`
//! the keys they understand, which is why callers that need to keep the
//! configuration hand out a [`Params::duplicate`] instead of the original.

mod error;
pub mod overrides;

use std::path::Path;

use serde_json::{Map, Value};

pub use error::ParamsError;
pub use overrides::{deep_merge, merge_overrides, parse_overrides};

/// Hierarchical experiment configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    values: Map<String, Value>,
    /// Dotted prefix of this node within the root config, for error messages.
    history: String,
}

impl Params {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            values,
            history: String::new(),
        }
    }

    /// Parse config text and apply `overrides` on top of it.
    pub fn parse(text: &str, overrides: &str) -> Result<Self, ParamsError> {
        let mut root = match serde_json::from_str::<Value>(text)? {
            value @ Value::Object(_) => value,
            _ => return Err(ParamsError::NotAnObject("config".to_string())),
        };
        deep_merge(&mut root, Value::Object(parse_overrides(overrides)?));

        match root {
            Value::Object(values) => Ok(Self::new(values)),
            _ => Err(ParamsError::NotAnObject("config".to_string())),
        }
    }

    /// Load config from a JSON file and apply `overrides` on top of it.
    pub fn from_file(path: &Path, overrides: &str) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, overrides)
    }

    /// Deep copy, for handing to a consumer that pops keys.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Serialize as compact JSON suitable for use as override text.
    pub fn to_overrides_text(&self) -> String {
        Value::Object(self.values.clone()).to_string()
    }

    /// Pretty-printed JSON.
    pub fn to_pretty_json(&self) -> String {
        format!("{:#}", Value::Object(self.values.clone()))
    }

    /// Look up a value by key or dotted path (`"model.encoder.dim"`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(path) {
            return Some(value);
        }
        let mut parts = path.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove and return a required top-level key.
    pub fn pop(&mut self, key: &str) -> Result<Value, ParamsError> {
        self.values
            .remove(key)
            .ok_or_else(|| ParamsError::MissingKey(self.qualified(key)))
    }

    pub fn pop_str(&mut self, key: &str) -> Result<String, ParamsError> {
        match self.pop(key)? {
            Value::String(s) => Ok(s),
            _ => Err(ParamsError::TypeMismatch {
                key: self.qualified(key),
                expected: "string",
            }),
        }
    }

    /// Remove a nested object and return it as its own `Params` node.
    pub fn pop_params(&mut self, key: &str) -> Result<Params, ParamsError> {
        match self.pop(key)? {
            Value::Object(values) => Ok(Params {
                values,
                history: format!("{}.", self.qualified(key)),
            }),
            _ => Err(ParamsError::TypeMismatch {
                key: self.qualified(key),
                expected: "object",
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail if any keys remain unconsumed.
    pub fn assert_empty(&self, owner: &str) -> Result<(), ParamsError> {
        if self.values.is_empty() {
            return Ok(());
        }
        Err(ParamsError::UnusedKeys {
            owner: owner.to_string(),
            keys: self.values.keys().map(|k| self.qualified(k)).collect(),
        })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    fn qualified(&self, key: &str) -> String {
        format!("{}{}", self.history, key)
    }
}
