// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use datalake_ingest::ingest::{Transport, TransportError};
use serde_json::Value;
use std::sync::Mutex;

/// Serves fixed payloads by URL; any other URL fails like a refused connection.
/// Records every requested URL in order.
pub struct ScriptedTransport {
    routes: Vec<(String, Result<Value, String>)>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(mut self, url: &str, body: Value) -> Self {
        self.routes.push((url.to_string(), Ok(body)));
        self
    }

    /// Respond with a decode failure, as for a 200 with a non-JSON body.
    pub fn garbage(mut self, url: &str) -> Self {
        self.routes
            .push((url.to_string(), Err("expected value at line 1 column 1".into())));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.routes.iter().find(|(u, _)| u == url) {
            Some((_, Ok(v))) => Ok(v.clone()),
            Some((_, Err(reason))) => Err(TransportError::Decode {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(TransportError::Request {
                url: url.to_string(),
                reason: "connection refused".into(),
            }),
        }
    }
}

/// `*.json` files directly under `dir`, sorted.
pub fn json_files(dir: &std::path::Path) -> Vec<String> {
    let mut v: Vec<String> = match std::fs::read_dir(dir) {
        Ok(rd) => rd
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.ends_with(".json"))
            .collect(),
        Err(_) => Vec::new(),
    };
    v.sort();
    v
}
