//! Data models shared by every pipeline stage.
//!
//! - [`SeedSite`]: A validated, absolute page to crawl for links
//! - [`CandidateLink`]: A discovered URL waiting for extraction
//! - [`ArticleRecord`]: Structured content pulled from one article page
//! - [`ExtractionOutcome`]: Success or failure of extracting one candidate
//!
//! Everything here lives for exactly one pipeline run.

use crate::error::ConfigError;
use chrono::NaiveDateTime;
use url::Url;

/// A page believed to link to recent articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSite {
    url: Url,
}

impl SeedSite {
    /// Validate that `raw` is an absolute URL with a scheme and a host.
    ///
    /// # Arguments
    ///
    /// * `raw` - The seed URL as given by the user; surrounding whitespace is ignored
    ///
    /// # Returns
    ///
    /// The seed, or [`ConfigError::NotAbsolute`] carrying `raw` unchanged.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|_| ConfigError::NotAbsolute(raw.to_string()))?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::NotAbsolute(raw.to_string()));
        }
        Ok(Self { url })
    }

    /// The parsed seed URL, used as the base for relative links.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host the seed's links must stay on.
    pub fn domain(&self) -> &str {
        // `parse` rejects URLs without a host.
        self.url.host_str().unwrap_or_default()
    }
}

/// A same-site URL found on a seed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// Absolute article URL.
    pub url: String,
    /// The seed page the link was found on.
    pub source_seed: String,
}

/// Structured content of one article, as produced by the parse capability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleRecord {
    /// Headline, empty when the page had none.
    pub title: String,
    /// Author names in byline order.
    pub authors: Vec<String>,
    /// Publication time as printed by the publisher, without a zone.
    pub publish_date: Option<NaiveDateTime>,
    /// Standfirst or meta description.
    pub description: Option<String>,
    /// Body text, paragraphs separated by newlines.
    pub main_text: String,
}

impl ArticleRecord {
    /// Whether the record carries any body text worth summarizing.
    pub fn has_main_text(&self) -> bool {
        !self.main_text.trim().is_empty()
    }
}

/// The result of attempting to extract one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Success { url: String, record: ArticleRecord },
    Failure { url: String, reason: String },
}

impl ExtractionOutcome {
    /// The candidate URL this outcome belongs to.
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A seed page that could not be crawled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    /// 1-based position of the seed in the input list.
    pub position: usize,
    pub url: String,
    pub reason: String,
}
