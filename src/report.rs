// src/report.rs
//! Leveled message sink injected into the collector and the processor.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warning => write!(f, "WARNING"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.report(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Forwards to `tracing`; the subscriber is whatever the caller installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "datalake", "{message}"),
            Level::Warning => tracing::warn!(target: "datalake", "{message}"),
            Level::Error => tracing::error!(target: "datalake", "{message}"),
        }
    }
}

// --- Test helper ---
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub messages: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<(Level, String)> {
        self.messages.lock().expect("reporter mutex poisoned").clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages
            .lock()
            .expect("reporter mutex poisoned")
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages
            .lock()
            .expect("reporter mutex poisoned")
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, level: Level, message: &str) {
        self.messages
            .lock()
            .expect("reporter mutex poisoned")
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_records_levels() {
        let r = MemoryReporter::new();
        r.info("starting");
        r.warning("Failed to fetch from x, trying next.");
        r.error("boom");
        assert_eq!(r.snapshot().len(), 3);
        assert_eq!(r.count(Level::Warning), 1);
        assert!(r.contains(Level::Warning, "trying next"));
        assert!(!r.contains(Level::Info, "boom"));
    }

    #[test]
    fn level_display_is_upper_case() {
        assert_eq!(Level::Warning.to_string(), "WARNING");
    }
}
