//! Client for upserting validated application documents into the remote
//! document store behind the app's API gateway.

use serde_json::Value;
use tracing::info;

use crate::SyncError;

/// HTTP client for the application-store upsert endpoint.
pub struct SeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl SeedClient {
    /// `base_url` should be like `https://api.mehko.app` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upsert one application document under its id. The document is sent
    /// as-is, so fields the typed model does not know about survive.
    pub async fn upsert_application(&self, id: &str, doc: &Value) -> Result<(), SyncError> {
        let url = format!("{}/api/applications/{id}", self.base_url);

        info!(id, url = %url, "upserting application");
        let resp = self.client.put(&url).json(doc).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
                url,
            });
        }
        info!(id, "upsert accepted");
        Ok(())
    }
}
