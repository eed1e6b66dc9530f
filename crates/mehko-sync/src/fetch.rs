//! Form PDF download client.
//!
//! The fetcher is a trait so the county processor can be exercised without a
//! network: production uses [`HttpFetcher`], tests substitute a stub that
//! fails chosen URLs.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Server { status: u16, url: String },
}

/// Fetches one PDF body, fully buffered. Implementations must return either
/// the complete body or an error — never a partial document.
#[async_trait]
pub trait FormFetcher: Send + Sync {
    async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, SyncError>;
}

/// Production fetcher backed by `reqwest`, client defaults for timeouts.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormFetcher for HttpFetcher {
    async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        info!(url, "downloading form pdf");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.bytes().await?;
        info!(url, bytes = body.len(), "form pdf downloaded");
        Ok(body.to_vec())
    }
}
