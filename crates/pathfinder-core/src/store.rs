//! Quiz store implementations.
//!
//! The real store lives in the host (typically browser local storage). These
//! cover tests, the CLI, and hosts that export a snapshot of it as JSON.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::traits::QuizStore;

/// In-memory store, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl QuizStore for MemoryStore {
    fn read(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(decode_stored)
    }
}

/// A JSON object snapshot of the client store, loaded from disk once.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore {
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Load a snapshot. The file must hold a JSON object of key → value.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read store snapshot: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse store snapshot: {}", path.display()))
    }

    /// Parse a snapshot from a string (useful for testing).
    pub fn from_json_str(content: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(content).context("invalid JSON")?;
        let Value::Object(map) = parsed else {
            anyhow::bail!("store snapshot must be a JSON object");
        };
        let values = map.into_iter().collect();
        Ok(Self {
            inner: MemoryStore { values },
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl QuizStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<Value> {
        self.inner.read(key)
    }
}

/// Local storage keeps strings, so a record may arrive as JSON-in-a-string.
/// Decode those; anything else is returned unchanged.
fn decode_stored(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                match serde_json::from_str(s) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        tracing::warn!("stored value looks like JSON but does not parse: {e}");
                        value.clone()
                    }
                }
            } else {
                value.clone()
            }
        }
        other => other.clone(),
    }
}
