//! # Deterministic Serialization: Composed Schema Bytes
//!
//! This module defines `SchemaBytes`, the sole construction path for the bytes
//! written to the composed schema file.
//!
//! ## Invariant
//!
//! The `SchemaBytes` newtype has a private inner field. The only way to
//! construct it is through `SchemaBytes::new()`, which sorts every object's
//! keys recursively and pretty-prints with two-space indentation followed by
//! a single trailing newline. Two builds from the same fragments therefore
//! produce byte-identical files regardless of how `serde_json::Map` orders
//! its entries.

use serde::Serialize;
use serde_json::Value;

/// Bytes of a pretty-printed JSON document with recursively sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaBytes(Vec<u8>);

impl SchemaBytes {
    /// Serialize any value into deterministic pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the value cannot be
    /// represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(obj)?;
        let sorted = sort_keys(value);
        let mut bytes = serde_json::to_vec_pretty(&sorted)?;
        bytes.push(b'\n');
        Ok(Self(bytes))
    }

    /// Access the serialized bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SchemaBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Rebuild every object with its entries inserted in key order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = serde_json::Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
