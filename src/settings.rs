// src/settings.rs
//! Storage roots and fetch timeout, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_RAW_ROOT: &str = "DATALAKE_RAW_ROOT";
pub const ENV_PROCESSED_ROOT: &str = "DATALAKE_PROCESSED_ROOT";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "DATALAKE_FETCH_TIMEOUT_SECS";

pub const DEFAULT_RAW_ROOT: &str = "data_lake";
pub const DEFAULT_PROCESSED_ROOT: &str = "processed_data";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub raw_root: PathBuf,
    pub processed_root: PathBuf,
    pub fetch_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            raw_root: PathBuf::from(DEFAULT_RAW_ROOT),
            processed_root: PathBuf::from(DEFAULT_PROCESSED_ROOT),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

// parse positive integer seconds; anything else falls back
fn parse_timeout_env(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
}

fn path_env(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

impl PipelineSettings {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            raw_root: path_env(ENV_RAW_ROOT).unwrap_or(d.raw_root),
            processed_root: path_env(ENV_PROCESSED_ROOT).unwrap_or(d.processed_root),
            fetch_timeout: parse_timeout_env(std::env::var(ENV_FETCH_TIMEOUT_SECS).ok())
                .unwrap_or(d.fetch_timeout),
        }
    }
}
