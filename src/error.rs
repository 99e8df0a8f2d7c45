//! Error types for the discovery and extraction pipeline.
//!
//! Only [`ConfigError`] ever reaches the caller of
//! [`run_pipeline`](crate::run_pipeline). Fetch and parse errors are absorbed
//! into the document as visible failure markers.

use std::time::Duration;
use thiserror::Error;

/// Precondition violations detected before any network activity.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No seed URLs were supplied.
    #[error("at least one seed URL is required")]
    NoSeeds,

    /// A seed URL failed to parse or lacks a scheme and host.
    #[error("seed URL is not absolute: {0}")]
    NotAbsolute(String),

    /// `max_articles_per_site` must be at least one.
    #[error("max articles per site must be greater than zero")]
    ZeroMaxArticles,

    /// A zero per-request budget would fail every fetch.
    #[error("timeout must be greater than zero seconds")]
    ZeroTimeout,

    /// The worker pool needs at least one slot.
    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,

    /// The HTTP client could not be built from the configured settings.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    /// The configuration file could not be read or decoded.
    #[error("failed to load configuration from {path}: {reason}")]
    Load { path: String, reason: String },
}

/// Transport-level failures of the fetch capability.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS, redirect or body-read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("request failed with status {0}")]
    Status(u16),

    /// The request did not finish within the allotted time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Anything raised by a non-HTTP fetcher implementation.
    #[error("{0}")]
    Other(String),
}

/// Failures of the parse capability for a single candidate.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page was fetched but held nothing recognisable as an article.
    #[error("no article content found")]
    NoContent,

    /// The parse did not finish within the allotted time.
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    /// Anything raised by a non-HTML parser implementation.
    #[error("{0}")]
    Other(String),
}
