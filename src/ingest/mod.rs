// src/ingest/mod.rs
pub mod collector;
pub mod config;
pub mod transport;
pub mod types;

pub use collector::Collector;
pub use config::{load_sources_default, load_sources_from, SourceCatalog};
pub use transport::{HttpTransport, Transport, TransportError};

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up once a recorder is installed).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collector_fetch_total", "Successful source fetches.");
        describe_counter!(
            "collector_fetch_errors_total",
            "Source fetches that failed after every candidate."
        );
        describe_counter!(
            "collector_fallback_total",
            "Candidate endpoints skipped after a failure."
        );
        describe_histogram!(
            "collector_fetch_seconds",
            "Fetch duration in seconds, fallback included."
        );
        describe_counter!("processor_artifacts_total", "Raw artifacts read.");
        describe_counter!(
            "processor_skipped_total",
            "Raw artifacts skipped (unreadable, unparseable or filtered out)."
        );
        describe_counter!("processor_records_total", "Filtered records produced.");
    });
}
