// tests/processor_filter.rs
use datalake_ingest::report::MemoryReporter;
use datalake_ingest::{FsArtifactStore, Level, PipelineError, ProcessingReport, Processor};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;

struct Lake {
    _tmp: tempfile::TempDir,
    raw: std::path::PathBuf,
    processed: std::path::PathBuf,
    processor: Processor,
    reporter: Arc<MemoryReporter>,
}

fn lake() -> Lake {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("data_lake");
    let processed = tmp.path().join("processed_data");
    let reporter = Arc::new(MemoryReporter::new());
    let processor = Processor::new(
        Arc::new(FsArtifactStore::new(&raw)),
        Arc::new(FsArtifactStore::new(&processed)),
        reporter.clone(),
    );
    Lake {
        _tmp: tmp,
        raw,
        processed,
        processor,
        reporter,
    }
}

fn put(root: &Path, source: &str, stamp: &str, body: &str) {
    let dir = root.join(source);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{source}_{stamp}.json")), body).unwrap();
}

#[test]
fn list_artifact_keeps_only_positive_revenue() {
    let l = lake();
    put(
        &l.raw,
        "crm",
        "2026-10-17T08:00:00.000000Z",
        r#"[{"revenue": 10}, {"revenue": -5}, {"revenue": 0}]"#,
    );
    let r = l.processor.process_source("crm").unwrap();
    assert_eq!(r.records, vec![json!([{"revenue": 10}])]);
    assert_eq!(r.artifacts, 1);
    assert_eq!(r.skipped, 0);
}

#[test]
fn object_artifacts_pass_or_fail_whole() {
    let l = lake();
    put(&l.raw, "finance", "T1", r#"{"revenue": -1}"#);
    put(&l.raw, "finance", "T2", r#"{"revenue": 5}"#);
    put(&l.raw, "finance", "T3", r#"{}"#);
    let r = l.processor.process_source("finance").unwrap();
    assert_eq!(r.records, vec![json!({"revenue": 5}), json!({})]);
    assert_eq!(r.skipped, 1);
}

#[test]
fn negative_object_yields_nothing() {
    let l = lake();
    put(&l.raw, "finance", "T1", r#"{"revenue": -1}"#);
    let r = l.processor.process_source("finance").unwrap();
    assert!(r.records.is_empty());
}

#[test]
fn missing_directory_is_not_found() {
    let l = lake();
    let err = l.processor.process_source("crm").unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(ref s) if s == "crm"));
    assert!(l.reporter.contains(Level::Error, "No data found for source crm"));
    assert!(!l.processed.exists());
}

#[test]
fn empty_directory_is_not_found_too() {
    let l = lake();
    fs::create_dir_all(l.raw.join("crm")).unwrap();
    let err = l.processor.process_source("crm").unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    assert!(l.reporter.contains(Level::Error, "holds no artifacts"));
}

#[test]
fn malformed_artifact_is_skipped_with_warning() {
    let l = lake();
    put(&l.raw, "crm", "T1", r#"{"revenue": 7"#);
    put(&l.raw, "crm", "T2", r#"[{"revenue": 7}]"#);
    let r = l.processor.process_source("crm").unwrap();
    assert_eq!(r.records, vec![json!([{"revenue": 7}])]);
    assert_eq!(r.skipped, 1);
    assert_eq!(l.reporter.count(Level::Warning), 1);
    assert!(l.reporter.contains(Level::Warning, "crm_T1.json"));
}

#[test]
fn report_is_persisted_under_processed_root() {
    let l = lake();
    put(&l.raw, "crm", "T1", r#"[{"revenue": 1}, {"revenue": 2}]"#);
    let r = l.processor.process_source("crm").unwrap();

    let out = r.output.clone().expect("output location");
    assert!(out.starts_with(&l.processed.join("crm").display().to_string()));
    let stored: ProcessingReport = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(stored.source, "crm");
    assert_eq!(stored.records, r.records);
    assert!(chrono::DateTime::parse_from_rfc3339(&stored.started_at).is_ok());
    assert!(stored.duration >= 0.0);

    // raw area untouched
    assert_eq!(fs::read_dir(l.raw.join("crm")).unwrap().count(), 1);
}
