//! Async HTTP fetch wrapping reqwest.
//!
//! One timed GET with a believable browser header set — the studio's hosting
//! rejects clients it does not recognize. No retries here: retry and fallback
//! policy belongs to the engine facade, one level up.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;
use thiserror::Error;

/// Typed fetch failures, all recovered by the engine facade.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
}

/// Fetch capability, injectable so the engine can be tested without a
/// network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw document body at `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Production fetcher with browser-like headers.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpClient {
    pub fn new(timeout_ms: u64) -> Self {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self { client, timeout_ms }
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_ms)
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}
