//! The fetch capability: download a page's HTML.
//!
//! [`Fetcher`] is the seam the rest of the pipeline depends on, so tests can
//! serve canned pages. [`HttpFetcher`] is the real implementation on top of a
//! shared `reqwest::Client`.

use crate::error::FetchError;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Browser-like user agent; many news sites block obvious bots outright.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Maximum number of redirects followed per request.
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Anything that can turn a URL into page content.
///
/// Implementations must treat non-2xx responses as [`FetchError::Status`].
pub trait Fetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// HTTP fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that sends `user_agent` and follows up to ten redirects.
    ///
    /// # Returns
    ///
    /// The fetcher, or [`FetchError::Transport`] when the TLS backend or the
    /// user agent header cannot be set up.
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let t0 = Instant::now();
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::Transport(e)
            }
        };

        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(map_err)?;
        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}
