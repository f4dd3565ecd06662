// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod error;
pub mod ingest;
pub mod process;
pub mod report;
pub mod settings;
pub mod storage;

// ---- Re-exports for stable public API ----
pub use crate::error::{PipelineError, Result};
pub use crate::ingest::types::{AcquisitionRecord, CollectionSummary, SourceConfig, SweepOutcome};
pub use crate::ingest::{Collector, HttpTransport, SourceCatalog, Transport};
pub use crate::process::{ProcessingReport, Processor};
pub use crate::report::{Level, Reporter, TracingReporter};
pub use crate::settings::PipelineSettings;
pub use crate::storage::{ArtifactKey, ArtifactStore, FsArtifactStore, MemoryArtifactStore};

use std::sync::Arc;

/// Collector and processor wired to the filesystem stores and HTTP transport
/// described by `settings`.
pub fn build_pipeline(
    settings: &PipelineSettings,
    sources: SourceCatalog,
    reporter: Arc<dyn Reporter>,
) -> (Collector, Processor) {
    let raw: Arc<dyn ArtifactStore> = Arc::new(FsArtifactStore::new(&settings.raw_root));
    let processed: Arc<dyn ArtifactStore> =
        Arc::new(FsArtifactStore::new(&settings.processed_root));
    let transport = Arc::new(HttpTransport::new(settings.fetch_timeout));
    let collector = Collector::new(sources, transport, raw.clone(), reporter.clone());
    let processor = Processor::new(raw, processed, reporter);
    (collector, processor)
}
