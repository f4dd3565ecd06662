// src/storage/mod.rs
//! Append-only artifact storage keyed by source and fetch timestamp.
//!
//! The collector appends raw payloads, the processor lists and reads them back and
//! appends its own reports to a second store. Two backends: [`FsArtifactStore`]
//! (one directory per source) and [`MemoryArtifactStore`].

pub mod fs;
pub mod memory;

pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;

use serde_json::Value;
use std::fmt;

use crate::error::{PipelineError, Result};

/// Identifies one stored artifact. `stamp` is the timestamp, plus a `_N` suffix
/// when an earlier artifact already used the same instant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactKey {
    pub source: String,
    pub stamp: String,
}

impl ArtifactKey {
    pub fn new(source: &str, stamp: &str) -> Self {
        Self {
            source: source.to_string(),
            stamp: stamp.to_string(),
        }
    }

    /// `{source}_{stamp}.json`
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.source, self.stamp)
    }

    /// Inverse of [`ArtifactKey::file_name`]; `None` for files of other sources.
    pub fn from_file_name(source: &str, file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".json")?;
        let stamp = stem.strip_prefix(source)?.strip_prefix('_')?;
        if stamp.is_empty() {
            return None;
        }
        Some(Self::new(source, stamp))
    }

    fn with_suffix(&self, n: u32) -> Self {
        Self::new(&self.source, &format!("{}_{n}", self.stamp))
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.file_name())
    }
}

pub trait ArtifactStore: Send + Sync {
    /// Keys for `source`, oldest first. `None` when nothing was ever stored for it.
    fn list(&self, source: &str) -> Result<Option<Vec<ArtifactKey>>>;

    /// Serialize `payload` unmodified as a new artifact. Never overwrites.
    fn append(&self, source: &str, stamp: &str, payload: &Value) -> Result<ArtifactKey>;

    fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>>;

    /// Human-readable location for logs.
    fn locate(&self, key: &ArtifactKey) -> String {
        key.to_string()
    }
}

/// Give up on finding a free suffix after this many collisions.
pub(crate) const MAX_COLLISION_SUFFIX: u32 = 1000;

/// Candidate keys for a new artifact: the plain stamp, then `_1`, `_2`, ...
pub(crate) fn candidate_keys(source: &str, stamp: &str) -> impl Iterator<Item = ArtifactKey> {
    let base = ArtifactKey::new(source, stamp);
    std::iter::once(base.clone()).chain((1..=MAX_COLLISION_SUFFIX).map(move |n| base.with_suffix(n)))
}

/// Source names become directory and file names.
pub fn validate_source_name(source: &str) -> Result<()> {
    let ok = !source.is_empty()
        && source != "."
        && source != ".."
        && !source.contains(['/', '\\', '\0']);
    if ok {
        Ok(())
    } else {
        Err(PipelineError::Storage(format!(
            "invalid source name for storage: {source:?}"
        )))
    }
}

pub(crate) fn encode(payload: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|e| PipelineError::Storage(e.to_string()))
}
