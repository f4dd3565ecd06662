// src/storage/fs.rs
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{candidate_keys, encode, validate_source_name, ArtifactKey, ArtifactStore};
use crate::error::{PipelineError, Result};

/// `{root}/{source}/{source}_{stamp}.json`
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }

    pub fn path_of(&self, key: &ArtifactKey) -> PathBuf {
        self.source_dir(&key.source).join(key.file_name())
    }
}

impl ArtifactStore for FsArtifactStore {
    fn list(&self, source: &str) -> Result<Option<Vec<ArtifactKey>>> {
        validate_source_name(source)?;
        let dir = self.source_dir(source);
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PipelineError::Storage(format!(
                    "listing {}: {e}",
                    dir.display()
                )))
            }
        };

        let mut keys = Vec::new();
        for e in entries.flatten() {
            if !e.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = e.file_name();
            if let Some(key) = name.to_str().and_then(|n| ArtifactKey::from_file_name(source, n)) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(Some(keys))
    }

    fn append(&self, source: &str, stamp: &str, payload: &Value) -> Result<ArtifactKey> {
        validate_source_name(source)?;
        let dir = self.source_dir(source);
        // create_dir_all tolerates a concurrent creator.
        fs::create_dir_all(&dir)
            .map_err(|e| PipelineError::Storage(format!("creating {}: {e}", dir.display())))?;
        let bytes = encode(payload)?;

        for key in candidate_keys(source, stamp) {
            let path = self.path_of(&key);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(PipelineError::Storage(format!(
                        "creating {}: {e}",
                        path.display()
                    )))
                }
            };
            file.write_all(&bytes)
                .and_then(|_| file.sync_all())
                .map_err(|e| PipelineError::Storage(format!("writing {}: {e}", path.display())))?;
            return Ok(key);
        }
        Err(PipelineError::Storage(format!(
            "no free artifact name for {source} at {stamp}"
        )))
    }

    fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        let path = self.path_of(key);
        fs::read(&path).map_err(|e| PipelineError::Storage(format!("reading {}: {e}", path.display())))
    }

    fn locate(&self, key: &ArtifactKey) -> String {
        self.path_of(key).display().to_string()
    }
}
