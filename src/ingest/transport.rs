// src/ingest/transport.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("datalake-ingest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Fetches one JSON document per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client, timeout }
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let rsp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if let Err(e) = rsp.error_for_status_ref() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: e.status().map(|s| s.as_u16()).unwrap_or_default(),
            });
        }

        // Decode ourselves so a bad body is a Decode error, not a Request one.
        let body = rsp.bytes().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Port 9 on loopback: nothing listens there in CI.
        let t = HttpTransport::new(Duration::from_millis(500));
        let err = t.get_json("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }

    #[tokio::test]
    async fn invalid_url_is_a_request_error() {
        let t = HttpTransport::new(Duration::from_secs(1));
        let err = t.get_json("not a url").await.unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }
}
