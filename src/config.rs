//! Pipeline configuration.
//!
//! Settings can come from a YAML file, from command-line flags, or from both,
//! with flags taking precedence. Every field has a default, so a file only
//! needs the keys it changes:
//!
//! ```yaml
//! seeds:
//!   - https://www.br.de/nachrichten
//!   - https://www.t-online.de/nachrichten
//! max_articles_per_site: 3
//! redactions:
//!   - "Loading..."
//! ```

use crate::error::ConfigError;
use crate::extractor::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use crate::fetch::DEFAULT_USER_AGENT;
use crate::models::SeedSite;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// Default number of articles taken from each seed page.
pub const DEFAULT_MAX_ARTICLES_PER_SITE: usize = 5;

/// Everything a pipeline run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed pages, crawled in this order.
    pub seeds: Vec<String>,
    /// Cap on candidate links taken from each seed.
    pub max_articles_per_site: usize,
    /// Literal strings removed from the assembled document, applied in order.
    pub redactions: Vec<String>,
    /// Per-request budget for every fetch and parse.
    pub timeout_secs: u64,
    /// Maximum number of seeds or articles processed at once.
    pub concurrency: usize,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            max_articles_per_site: DEFAULT_MAX_ARTICLES_PER_SITE,
            redactions: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Decode a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Read and decode a YAML configuration file.
    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let load_err = |reason: String| ConfigError::Load {
            path: path.to_string(),
            reason,
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| load_err(e.to_string()))?;
        let config = Self::from_yaml_str(&raw).map_err(|e| load_err(e.to_string()))?;
        info!(seeds = config.seeds.len(), "Loaded pipeline configuration");
        Ok(config)
    }

    /// Per-request budget as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check every precondition and return the parsed seeds.
    ///
    /// Nothing is fetched when this fails.
    ///
    /// # Returns
    ///
    /// The seeds in input order, or the first violated precondition: no seeds,
    /// a zero article cap, a zero timeout, zero concurrency, or a seed that is
    /// not an absolute URL.
    pub fn validate(&self) -> Result<Vec<SeedSite>, ConfigError> {
        if self.seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }
        if self.max_articles_per_site == 0 {
            return Err(ConfigError::ZeroMaxArticles);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.seeds.iter().map(|s| SeedSite::parse(s)).collect()
    }
}
