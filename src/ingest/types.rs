// src/ingest/types.rs
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// RFC 3339 / ISO-8601 with microseconds, e.g. `2026-10-17T08:15:02.123456Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Where a source can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoints {
    /// One URL; any failure fails the fetch.
    Single(String),
    /// Ordered candidates, tried once each until one succeeds. Never empty.
    Fallback(Vec<String>),
}

impl Endpoints {
    pub fn urls(&self) -> &[String] {
        match self {
            Endpoints::Single(u) => std::slice::from_ref(u),
            Endpoints::Fallback(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceConfig {
    pub name: String,
    pub endpoints: Endpoints,
}

/// On-disk shape of one source entry: exactly one of the two keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSourceEntry {
    #[serde(default, alias = "url")]
    pub endpoint: Option<String>,
    #[serde(default, alias = "urls")]
    pub endpoints: Option<Vec<String>>,
}

impl SourceConfig {
    pub fn single(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoints: Endpoints::Single(url.to_string()),
        }
    }

    pub fn fallback<S: AsRef<str>>(name: &str, urls: &[S]) -> Self {
        Self {
            name: name.to_string(),
            endpoints: Endpoints::Fallback(urls.iter().map(|u| u.as_ref().to_string()).collect()),
        }
    }

    /// Validate a raw entry: exactly one form present, list non-empty, no blank URLs.
    pub fn from_raw(name: &str, raw: RawSourceEntry) -> Result<Self> {
        let bad = |why: &str| PipelineError::Configuration(format!("{name}: {why}"));
        let endpoints = match (raw.endpoint, raw.endpoints) {
            (Some(_), Some(_)) => return Err(bad("both 'endpoint' and 'endpoints' are set")),
            (None, None) => return Err(bad("missing 'endpoint' or 'endpoints'")),
            (Some(u), None) => {
                let u = u.trim().to_string();
                if u.is_empty() {
                    return Err(bad("empty endpoint"));
                }
                Endpoints::Single(u)
            }
            (None, Some(list)) => {
                let list: Vec<String> = list.into_iter().map(|u| u.trim().to_string()).collect();
                if list.is_empty() {
                    return Err(bad("'endpoints' must not be empty"));
                }
                if list.iter().any(|u| u.is_empty()) {
                    return Err(bad("empty endpoint in 'endpoints'"));
                }
                Endpoints::Fallback(list)
            }
        };
        if name.trim().is_empty() {
            return Err(PipelineError::Configuration("empty source name".into()));
        }
        Ok(Self {
            name: name.to_string(),
            endpoints,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
}

/// Metadata of one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionRecord {
    pub status: FetchStatus,
    pub source: String,
    pub timestamp: String,
    /// Seconds, covering every fallback attempt.
    pub duration: f64,
    pub endpoint: String,
    pub artifact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub kind: String,
    pub error: String,
}

/// What actually happened in a sweep, next to the fixed `status` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepOutcome {
    Success,
    Partial,
    Failed,
    Empty,
}

impl SweepOutcome {
    pub fn from_counts(ok: usize, failed: usize) -> Self {
        match (ok, failed) {
            (0, 0) => SweepOutcome::Empty,
            (_, 0) => SweepOutcome::Success,
            (0, _) => SweepOutcome::Failed,
            _ => SweepOutcome::Partial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Always `"completed"`; see `outcome` for the real result.
    pub status: String,
    pub outcome: SweepOutcome,
    pub timestamp: String,
    pub results: Vec<AcquisitionRecord>,
    pub failures: Vec<SourceFailure>,
}

pub const SWEEP_STATUS_COMPLETED: &str = "completed";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_entry_must_have_exactly_one_form() {
        let both = RawSourceEntry {
            endpoint: Some("http://a".into()),
            endpoints: Some(vec!["http://b".into()]),
        };
        assert!(SourceConfig::from_raw("x", both).is_err());
        assert!(SourceConfig::from_raw("x", RawSourceEntry::default()).is_err());

        let empty = RawSourceEntry {
            endpoint: None,
            endpoints: Some(vec![]),
        };
        assert!(SourceConfig::from_raw("x", empty).is_err());

        let ok = RawSourceEntry {
            endpoint: None,
            endpoints: Some(vec![" http://a ".into(), "http://b".into()]),
        };
        let cfg = SourceConfig::from_raw("market", ok).unwrap();
        assert_eq!(cfg.endpoints.urls(), ["http://a", "http://b"]);
    }

    #[test]
    fn outcome_reflects_counts() {
        assert_eq!(SweepOutcome::from_counts(3, 0), SweepOutcome::Success);
        assert_eq!(SweepOutcome::from_counts(2, 1), SweepOutcome::Partial);
        assert_eq!(SweepOutcome::from_counts(0, 3), SweepOutcome::Failed);
        assert_eq!(SweepOutcome::from_counts(0, 0), SweepOutcome::Empty);
    }

    #[test]
    fn timestamps_parse_back() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
