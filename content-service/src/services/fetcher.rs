//! Page retrieval over HTTP.

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Request(String),

    #[error("content too large: {0} bytes")]
    TooLarge(u64),
}

#[async_trait]
pub trait WebFetcher: Send + Sync {
    /// Fetch the page body at `url` as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_bytes: config.max_bytes,
        }
    }
}

#[async_trait]
impl WebFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(FetchError::TooLarge(length));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if body.len() as u64 > self.max_bytes {
            return Err(FetchError::TooLarge(body.len() as u64));
        }

        Ok(body)
    }
}

/// Mock fetcher for testing, serving a canned page body.
pub struct MockWebFetcher {
    enabled: bool,
    body: String,
    fetch_count: AtomicU64,
}

impl MockWebFetcher {
    pub fn new(enabled: bool, body: &str) -> Self {
        Self {
            enabled,
            body: body.to_string(),
            fetch_count: AtomicU64::new(0),
        }
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebFetcher for MockWebFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(FetchError::Request(
                "mock web fetcher is not enabled".to_string(),
            ));
        }

        tracing::info!(url = %url, "[MOCK] page body served");
        Ok(self.body.clone())
    }
}
