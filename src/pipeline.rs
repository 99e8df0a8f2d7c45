//! End-to-end pipeline: seeds → candidates → outcomes → document.
//!
//! [`Pipeline`] owns the fetch and parse capabilities plus the configuration,
//! and [`run_pipeline`] is the one-call entry point using HTTP defaults.
//!
//! Only configuration problems are returned as errors. Every seed or article
//! failure ends up as a numbered marker in the document instead.

use crate::assembler::{Document, redact};
use crate::config::PipelineConfig;
use crate::discovery::discover_seed;
use crate::error::ConfigError;
use crate::extractor::extract;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::models::{CandidateLink, SeedFailure, SeedSite};
use crate::parser::{ArticleParser, HtmlArticleParser};
use crate::{publish_error, publish_info};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{info, instrument, warn};

#[cfg_attr(not(feature = "publish"), allow(dead_code))]
const SERVICE: &str = "news_digest";

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    /// The assembled, redacted text handed to the summarizer.
    pub content: String,
    /// Typed blocks the content was rendered from, before redaction.
    pub document: Document,
    /// Number of candidate links submitted for extraction.
    pub candidates: usize,
    /// Number of candidates that produced an article block.
    pub extracted: usize,
    /// Number of seeds whose page could not be fetched.
    pub seeds_failed: usize,
}

/// Discovery, extraction and assembly over a fixed configuration.
#[derive(Debug)]
pub struct Pipeline<F, P> {
    fetcher: F,
    parser: P,
    config: PipelineConfig,
}

impl Pipeline<HttpFetcher, HtmlArticleParser<HttpFetcher>> {
    /// Build a pipeline that fetches over HTTP with the configured user agent.
    pub fn from_config(config: PipelineConfig) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.user_agent)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let parser = HtmlArticleParser::new(fetcher.clone());
        Ok(Self::new(fetcher, parser, config))
    }
}

impl<F: Fetcher, P: ArticleParser> Pipeline<F, P> {
    /// Assemble a pipeline from explicit capabilities.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Downloads seed pages during discovery
    /// * `parser` - Turns each candidate URL into an article record
    /// * `config` - Seeds, limits and redactions; validated when [`run`](Self::run) starts
    pub fn new(fetcher: F, parser: P, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            parser,
            config,
        }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Crawl every seed and concatenate their candidates in seed order.
    ///
    /// Seeds are fetched concurrently, but the result never depends on which
    /// seed answers first.
    ///
    /// # Returns
    ///
    /// The candidates of all seeds, plus one [`SeedFailure`] per seed whose
    /// page could not be fetched, both in seed order.
    #[instrument(level = "info", skip_all, fields(seeds = seeds.len()))]
    pub async fn discover_all(
        &self,
        seeds: &[SeedSite],
    ) -> (Vec<CandidateLink>, Vec<SeedFailure>) {
        let max_articles = self.config.max_articles_per_site;
        let timeout = self.config.timeout();

        let mut results: Vec<_> = stream::iter(seeds.iter().enumerate())
            .map(|(i, seed)| async move {
                let found = discover_seed(&self.fetcher, seed, max_articles, timeout).await;
                (i, seed, found)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        results.sort_unstable_by_key(|(i, _, _)| *i);

        let mut candidates = Vec::new();
        let mut failures = Vec::new();
        for (i, seed, found) in results {
            match found {
                Ok(links) => candidates.extend(links),
                Err(e) => failures.push(SeedFailure {
                    position: i + 1,
                    url: seed.url().to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        info!(
            candidates = candidates.len(),
            seeds_failed = failures.len(),
            "Discovery complete"
        );
        (candidates, failures)
    }

    /// Run the whole pipeline over the configured seeds.
    ///
    /// # Returns
    ///
    /// The [`Digest`] of the run, or a [`ConfigError`] when the configuration
    /// fails validation. Nothing is fetched in the error case.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> Result<Digest, ConfigError> {
        let seeds = match self.config.validate() {
            Ok(seeds) => seeds,
            Err(e) => {
                publish_error!(
                    SERVICE,
                    event_kind = "pipeline.failed",
                    reason = e.to_string(),
                    "Pipeline rejected its configuration"
                );
                return Err(e);
            }
        };

        let t0 = Instant::now();
        publish_info!(
            SERVICE,
            event_kind = "pipeline.started",
            seeds = seeds.len(),
            max_articles_per_site = self.config.max_articles_per_site,
            "Pipeline starting"
        );

        let (candidates, seed_failures) = self.discover_all(&seeds).await;
        publish_info!(
            SERVICE,
            event_kind = "discovery.completed",
            candidates = candidates.len(),
            seeds_failed = seed_failures.len(),
            "Link discovery completed"
        );

        info!(count = candidates.len(), "Total articles to extract");
        let outcomes = extract(
            &self.parser,
            &candidates,
            self.config.timeout(),
            self.config.concurrency,
        )
        .await;
        let extracted = outcomes.iter().filter(|o| o.is_success()).count();
        publish_info!(
            SERVICE,
            event_kind = "extraction.completed",
            total = outcomes.len(),
            succeeded = extracted,
            failed = outcomes.len() - extracted,
            "Article extraction completed"
        );
        if extracted == 0 {
            warn!("No article could be extracted; document contains only failure markers");
        }

        let mut document = Document::new();
        document.push_seed_failures(&seed_failures);
        document.push_outcomes(outcomes);
        let content = redact(&document.render(), &self.config.redactions);

        let elapsed = t0.elapsed();
        info!(
            ?elapsed,
            bytes = content.len(),
            candidates = candidates.len(),
            extracted,
            "Pipeline complete"
        );
        publish_info!(
            SERVICE,
            event_kind = "pipeline.completed",
            duration_millis = elapsed.as_millis() as u64,
            bytes = content.len(),
            "Pipeline completed"
        );

        Ok(Digest {
            content,
            document,
            candidates: candidates.len(),
            extracted,
            seeds_failed: seed_failures.len(),
        })
    }
}

/// Crawl `seed_urls`, extract up to `max_articles_per_site` articles from
/// each, and return the assembled document with `redactions` removed.
///
/// An empty seed list or a non-absolute seed URL is rejected before any
/// request is made.
pub async fn run_pipeline(
    seed_urls: &[String],
    max_articles_per_site: usize,
    redactions: &[String],
) -> Result<String, ConfigError> {
    let config = PipelineConfig {
        seeds: seed_urls.to_vec(),
        max_articles_per_site,
        redactions: redactions.to_vec(),
        ..Default::default()
    };
    config.validate()?;
    let digest = Pipeline::from_config(config)?.run().await?;
    Ok(digest.content)
}
