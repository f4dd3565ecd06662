// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::{RawSourceEntry, SourceConfig};

pub const ENV_SOURCES_PATH: &str = "DATALAKE_SOURCES_PATH";

/// Ordered source configuration. Lookups are by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCatalog {
    sources: Vec<SourceConfig>,
}

impl SourceCatalog {
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        Self { sources }
    }

    /// CRM revenue, finance, and the two-endpoint market feed.
    pub fn builtin() -> Self {
        Self::new(vec![
            SourceConfig::single("crm", "https://api.crm.example.com/revenue"),
            SourceConfig::single("finance", "https://api.finance.example.com/financials"),
            SourceConfig::fallback(
                "market",
                &[
                    "https://api.market1.example.com",
                    "https://api.market2.example.com",
                ],
            ),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Load sources from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<SourceCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
        .with_context(|| format!("parsing sources from {}", path.display()))
}

/// Load sources using env var + fallbacks:
/// 1) $DATALAKE_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_sources_default() -> Result<SourceCatalog> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(SourceCatalog::builtin())
}

#[derive(serde::Deserialize)]
struct SourcesFile {
    sources: BTreeMap<String, RawSourceEntry>,
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<SourceCatalog> {
    let raw = match hint_ext {
        "toml" => parse_toml(s)?,
        "json" => parse_json(s)?,
        // No usable extension: JSON documents start with '{', anything else is tried as TOML.
        _ if s.trim_start().starts_with('{') => parse_json(s)?,
        _ => parse_toml(s)?,
    };
    into_catalog(raw)
}

fn parse_toml(s: &str) -> Result<BTreeMap<String, RawSourceEntry>> {
    let v: SourcesFile = toml::from_str(s)?;
    Ok(v.sources)
}

/// JSON accepts `{"sources": {...}}` or the bare mapping.
fn parse_json(s: &str) -> Result<BTreeMap<String, RawSourceEntry>> {
    if let Ok(v) = serde_json::from_str::<SourcesFile>(s) {
        return Ok(v.sources);
    }
    let v: BTreeMap<String, RawSourceEntry> = serde_json::from_str(s)?;
    Ok(v)
}

fn into_catalog(raw: BTreeMap<String, RawSourceEntry>) -> Result<SourceCatalog> {
    let mut sources = Vec::with_capacity(raw.len());
    for (name, entry) in raw {
        sources.push(SourceConfig::from_raw(name.trim(), entry)?);
    }
    Ok(SourceCatalog::new(sources))
}
