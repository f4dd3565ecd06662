// src/process/mod.rs
pub mod filter;

pub use filter::{filter_payload, SkipReason};

use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{PipelineError, Result};
use crate::ingest::config::SourceCatalog;
use crate::ingest::ensure_metrics_described;
use crate::ingest::types::format_timestamp;
use crate::report::Reporter;
use crate::storage::{ArtifactKey, ArtifactStore};

/// Result of one `process_source` call. This is also the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub source: String,
    pub started_at: String,
    /// Seconds.
    pub duration: f64,
    pub artifacts: usize,
    pub skipped: usize,
    pub records: Vec<Value>,
    /// Where the report was stored; not part of the stored document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Reads raw artifacts, filters them and writes one report per run.
pub struct Processor {
    raw: Arc<dyn ArtifactStore>,
    processed: Arc<dyn ArtifactStore>,
    reporter: Arc<dyn Reporter>,
}

impl Processor {
    pub fn new(
        raw: Arc<dyn ArtifactStore>,
        processed: Arc<dyn ArtifactStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            raw,
            processed,
            reporter,
        }
    }

    pub fn process_source(&self, source: &str) -> Result<ProcessingReport> {
        let started = Utc::now();
        let t0 = Instant::now();
        self.reporter
            .info(&format!("Starting data processing from {source}."));

        let keys = match self.raw.list(source)? {
            None => {
                self.reporter
                    .error(&format!("No data found for source {source}."));
                return Err(PipelineError::NotFound(source.to_string()));
            }
            Some(keys) if keys.is_empty() => {
                self.reporter
                    .error(&format!("Raw area for {source} exists but holds no artifacts."));
                return Err(PipelineError::NotFound(source.to_string()));
            }
            Some(keys) => keys,
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for key in &keys {
            match self.load(key) {
                Ok(payload) => match filter_payload(payload) {
                    Ok(rec) => records.push(rec),
                    Err(reason) => {
                        skipped += 1;
                        if reason == SkipReason::UnsupportedShape {
                            self.reporter.warning(&format!(
                                "Skipping {}: {}.",
                                self.raw.locate(key),
                                reason.as_str()
                            ));
                        }
                    }
                },
                Err(e) => {
                    skipped += 1;
                    self.reporter.warning(&e.to_string());
                }
            }
        }

        counter!("processor_artifacts_total", "source" => source.to_string())
            .increment(keys.len() as u64);
        counter!("processor_skipped_total", "source" => source.to_string())
            .increment(skipped as u64);
        counter!("processor_records_total", "source" => source.to_string())
            .increment(records.len() as u64);

        let started_at = format_timestamp(started);
        let mut report = ProcessingReport {
            source: source.to_string(),
            started_at: started_at.clone(),
            duration: t0.elapsed().as_secs_f64(),
            artifacts: keys.len(),
            skipped,
            records,
            output: None,
        };

        let doc = serde_json::to_value(&report)
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        let out_key = self.processed.append(source, &started_at, &doc)?;
        let location = self.processed.locate(&out_key);
        self.reporter.info(&format!(
            "Processed {} artifacts from {source} ({} skipped). Stored at {location}.",
            report.artifacts, report.skipped
        ));
        report.output = Some(location);
        Ok(report)
    }

    /// Process every configured source; failures are logged and left out.
    pub fn process_all(&self, sources: &SourceCatalog) -> Vec<ProcessingReport> {
        let mut out = Vec::with_capacity(sources.len());
        for cfg in sources.iter() {
            match self.process_source(&cfg.name) {
                Ok(r) => out.push(r),
                Err(e) => self
                    .reporter
                    .error(&format!("Failed to process data from {}: {e}", cfg.name)),
            }
        }
        out
    }

    fn load(&self, key: &ArtifactKey) -> Result<Value> {
        let bytes = self.raw.read(key)?;
        serde_json::from_slice(&bytes).map_err(|e| PipelineError::Parse {
            key: self.raw.locate(key),
            reason: e.to_string(),
        })
    }
}
