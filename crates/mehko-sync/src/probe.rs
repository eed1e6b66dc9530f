//! Advisory PDF reachability probe.
//!
//! County sites frequently sit behind bot protection that answers 403 to
//! automated clients even when the PDF is fine in a browser, so a 403 is
//! classified as "needs verification" rather than a hard failure. The probe
//! never blocks ingestion by itself.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::SyncError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; CountyValidator/1.0)";

/// Classification of one `pdfUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfAccess {
    /// 2xx with a `application/pdf` content type.
    Reachable,
    /// HTTP 403: likely bot protection, verify by hand.
    NeedsVerification,
    /// Anything else: bad status, wrong content type, network error, timeout.
    Unreachable { reason: String },
}

/// Probes one URL. Infallible by design: every failure mode folds into a
/// [`PdfAccess`] classification. A trait for the same reason as
/// [`crate::FormFetcher`]: callers can be exercised without a network.
#[async_trait]
pub trait PdfProbe: Send + Sync {
    async fn probe(&self, url: &str) -> PdfAccess;
}

pub struct PdfProber {
    client: reqwest::Client,
}

impl PdfProber {
    pub fn new() -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PdfProbe for PdfProber {
    async fn probe(&self, url: &str) -> PdfAccess {
        debug!(url, "probing pdf url");
        match self.client.get(url).send().await {
            Ok(resp) => {
                let content_type = resp
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                classify(resp.status().as_u16(), content_type.as_deref(), url)
            }
            Err(e) if e.is_timeout() => PdfAccess::Unreachable {
                reason: format!("PDF URL timeout: {url}"),
            },
            Err(e) => PdfAccess::Unreachable {
                reason: format!("failed to access PDF: {url} - {e}"),
            },
        }
    }
}

fn classify(status: u16, content_type: Option<&str>, url: &str) -> PdfAccess {
    match status {
        200..=299 => match content_type {
            Some(ct) if ct.contains("application/pdf") => PdfAccess::Reachable,
            ct => PdfAccess::Unreachable {
                reason: format!(
                    "PDF URL does not return PDF content: {url} (Content-Type: {})",
                    ct.unwrap_or("none")
                ),
            },
        },
        403 => PdfAccess::NeedsVerification,
        _ => PdfAccess::Unreachable {
            reason: format!("PDF URL returned status {status}: {url}"),
        },
    }
}
