//! Override layers for hierarchical configuration.
//!
//! Override text is a JSON object whose keys may be dotted paths
//! (`{"model.encoder.dim": 3}`). Dotted keys expand into nested objects before
//! merging. Layers compose with [`deep_merge`]: objects merge recursively and
//! any other value replaces what was there.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::error::ParamsError;

/// Parse override text into a nested object.
///
/// Empty or whitespace-only text means "no overrides".
pub fn parse_overrides(text: &str) -> Result<Map<String, Value>, ParamsError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(unflatten(map)),
        _ => Err(ParamsError::NotAnObject("overrides".to_string())),
    }
}

/// Expand dotted keys into nested objects, recursively.
pub fn unflatten(map: Map<String, Value>) -> Map<String, Value> {
    let mut nested = Map::new();
    for (key, value) in map {
        let value = match value {
            Value::Object(inner) => Value::Object(unflatten(inner)),
            other => other,
        };
        insert_path(&mut nested, &key, value);
    }
    nested
}

fn insert_path(target: &mut Map<String, Value>, dotted: &str, value: Value) {
    match dotted.split_once('.') {
        Some((head, rest)) if !head.is_empty() && !rest.is_empty() => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
        _ => match target.get_mut(dotted) {
            Some(existing) => deep_merge(existing, value),
            None => {
                target.insert(dotted.to_string(), value);
            }
        },
    }
}

/// Merge `source` on top of `target`. `source` wins on conflicts.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                match dst.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        dst.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Compose a base substitution layer with caller-supplied override text.
///
/// Precedence: `fallback` (the caller's overrides) is applied on top of `base`,
/// so the caller wins when both set the same key. Returns the combined
/// override text.
pub fn merge_overrides(
    base: &BTreeMap<String, String>,
    fallback: &str,
) -> Result<String, ParamsError> {
    let substitutions: Map<String, Value> = base
        .iter()
        .map(|(key, path)| (key.clone(), Value::String(path.clone())))
        .collect();
    let mut merged = Value::Object(unflatten(substitutions));
    deep_merge(&mut merged, Value::Object(parse_overrides(fallback)?));
    Ok(merged.to_string())
}
