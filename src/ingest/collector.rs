// src/ingest/collector.rs
use chrono::Utc;
use metrics::{counter, histogram};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{PipelineError, Result};
use crate::ingest::config::SourceCatalog;
use crate::ingest::ensure_metrics_described;
use crate::ingest::transport::Transport;
use crate::ingest::types::{
    format_timestamp, timestamp_now, AcquisitionRecord, CollectionSummary, Endpoints,
    FetchStatus, SourceConfig, SourceFailure, SweepOutcome, SWEEP_STATUS_COMPLETED,
};
use crate::report::Reporter;
use crate::storage::ArtifactStore;

/// Fetches configured sources and appends each payload to the raw store.
pub struct Collector {
    sources: SourceCatalog,
    transport: Arc<dyn Transport>,
    raw: Arc<dyn ArtifactStore>,
    reporter: Arc<dyn Reporter>,
}

impl Collector {
    pub fn new(
        sources: SourceCatalog,
        transport: Arc<dyn Transport>,
        raw: Arc<dyn ArtifactStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            sources,
            transport,
            raw,
            reporter,
        }
    }

    pub fn sources(&self) -> &SourceCatalog {
        &self.sources
    }

    /// Fetch one source, falling back across its candidates, and store the payload.
    pub async fn fetch_one(&self, source: &str) -> Result<AcquisitionRecord> {
        let cfg = self
            .sources
            .get(source)
            .ok_or_else(|| PipelineError::Configuration(source.to_string()))?;

        let t0 = Instant::now();
        self.reporter
            .info(&format!("Starting data fetch from {source}."));

        let (endpoint, payload) = match self.fetch_payload(cfg).await {
            Ok(v) => v,
            Err(e) => {
                self.reporter.error(&e.to_string());
                counter!("collector_fetch_errors_total", "source" => source.to_string())
                    .increment(1);
                return Err(e);
            }
        };
        let duration = t0.elapsed().as_secs_f64();

        let timestamp = format_timestamp(Utc::now());
        let key = self.raw.append(source, &timestamp, &payload).inspect_err(|e| {
            self.reporter
                .error(&format!("Failed to store data from {source}: {e}"));
        })?;
        let location = self.raw.locate(&key);
        self.reporter.info(&format!(
            "Data fetched from {source} successfully. Stored at {location}."
        ));

        counter!("collector_fetch_total", "source" => source.to_string()).increment(1);
        histogram!("collector_fetch_seconds").record(duration);

        Ok(AcquisitionRecord {
            status: FetchStatus::Success,
            source: source.to_string(),
            timestamp,
            duration,
            endpoint,
            artifact: location,
        })
    }

    /// Single endpoint: any failure is final. Fallback list: warn and try the next.
    async fn fetch_payload(&self, cfg: &SourceConfig) -> Result<(String, Value)> {
        match &cfg.endpoints {
            Endpoints::Single(url) => {
                let v = self
                    .transport
                    .get_json(url)
                    .await
                    .map_err(|e| PipelineError::fetch(&cfg.name, e.to_string()))?;
                Ok((url.clone(), v))
            }
            Endpoints::Fallback(urls) => {
                for url in urls {
                    match self.transport.get_json(url).await {
                        Ok(v) => return Ok((url.clone(), v)),
                        Err(e) => {
                            self.reporter
                                .warning(&format!("Failed to fetch from {url}, trying next. ({e})"));
                            counter!("collector_fallback_total", "source" => cfg.name.clone())
                                .increment(1);
                        }
                    }
                }
                Err(PipelineError::fetch(
                    &cfg.name,
                    format!("no reachable endpoint among {} candidates", urls.len()),
                ))
            }
        }
    }

    /// One sequential pass over every configured source. Never fails as a whole.
    pub async fn fetch_all(&self) -> CollectionSummary {
        let mut results = Vec::with_capacity(self.sources.len());
        let mut failures = Vec::new();

        for cfg in self.sources.iter() {
            match self.fetch_one(&cfg.name).await {
                Ok(rec) => results.push(rec),
                Err(e) => {
                    self.reporter
                        .error(&format!("Failed to collect data from {}: {e}", cfg.name));
                    failures.push(SourceFailure {
                        source: cfg.name.clone(),
                        kind: e.kind().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let outcome = SweepOutcome::from_counts(results.len(), failures.len());
        self.reporter.info(&format!(
            "Data collection completed: {} succeeded, {} failed.",
            results.len(),
            failures.len()
        ));

        CollectionSummary {
            status: SWEEP_STATUS_COMPLETED.to_string(),
            outcome,
            timestamp: timestamp_now(),
            results,
            failures,
        }
    }
}
