// src/storage/memory.rs
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{candidate_keys, encode, validate_source_name, ArtifactKey, ArtifactStore};
use crate::error::{PipelineError, Result};

/// In-process store; handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    inner: Mutex<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store arbitrary bytes under an exact key, bypassing JSON encoding.
    pub fn insert_raw(&self, source: &str, stamp: &str, bytes: impl Into<Vec<u8>>) -> ArtifactKey {
        let mut map = self.inner.lock().expect("store mutex poisoned");
        map.entry(source.to_string())
            .or_default()
            .insert(stamp.to_string(), bytes.into());
        ArtifactKey::new(source, stamp)
    }

    /// Register a source with no artifacts (an empty directory, on disk).
    pub fn touch(&self, source: &str) {
        let mut map = self.inner.lock().expect("store mutex poisoned");
        map.entry(source.to_string()).or_default();
    }

    pub fn count(&self, source: &str) -> usize {
        let map = self.inner.lock().expect("store mutex poisoned");
        map.get(source).map(|m| m.len()).unwrap_or(0)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn list(&self, source: &str) -> Result<Option<Vec<ArtifactKey>>> {
        validate_source_name(source)?;
        let map = self.inner.lock().expect("store mutex poisoned");
        Ok(map
            .get(source)
            .map(|m| m.keys().map(|stamp| ArtifactKey::new(source, stamp)).collect()))
    }

    fn append(&self, source: &str, stamp: &str, payload: &Value) -> Result<ArtifactKey> {
        validate_source_name(source)?;
        let bytes = encode(payload)?;
        let mut map = self.inner.lock().expect("store mutex poisoned");
        let slot = map.entry(source.to_string()).or_default();
        for key in candidate_keys(source, stamp) {
            if !slot.contains_key(&key.stamp) {
                slot.insert(key.stamp.clone(), bytes);
                return Ok(key);
            }
        }
        Err(PipelineError::Storage(format!(
            "no free artifact name for {source} at {stamp}"
        )))
    }

    fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        let map = self.inner.lock().expect("store mutex poisoned");
        map.get(&key.source)
            .and_then(|m| m.get(&key.stamp))
            .cloned()
            .ok_or_else(|| PipelineError::Storage(format!("artifact {key} does not exist")))
    }

    fn locate(&self, key: &ArtifactKey) -> String {
        format!("memory://{key}")
    }
}
