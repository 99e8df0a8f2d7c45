//! Summarization of the assembled document by an OpenAI-compatible LLM.
//!
//! The pipeline itself stops at the text artifact; this module is the
//! downstream consumer used by the binary. The document becomes the user
//! message, the system instruction comes from an `awful_aj` chat template, and
//! the output-token budget from the `awful_aj` configuration file.
//!
//! Calls go through [`RetryAsk`], which retries with exponential backoff and
//! jitter:
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=250ms)
//! ```

use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::utils::truncate_for_log;

/// Something that answers a prompt asynchronously.
pub trait AskAsync {
    type Response;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Retry decorator for any [`AskAsync`].
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
    max_jitter_ms: u64,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Wrap `inner` with retries.
    ///
    /// # Arguments
    ///
    /// * `inner` - The client to retry
    /// * `max_retries` - Retries after the first attempt before giving up
    /// * `base_delay` - Delay before the first retry; doubles each time, capped at 30 seconds
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
            max_jitter_ms: 250,
        }
    }

    /// Disable random jitter. Used where delays must be predictable.
    pub fn without_jitter(mut self) -> Self {
        self.max_jitter_ms = 0;
        self
    }

    /// Backoff before retry number `attempt` (1-based), without jitter.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1) as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let err = match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };
            attempt += 1;

            if attempt > self.max_retries {
                error!(
                    attempt,
                    max = self.max_retries,
                    elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                    error = %err,
                    "ask() exhausted retries"
                );
                return Err(err);
            }

            let jitter = if self.max_jitter_ms == 0 {
                0
            } else {
                rng().random_range(0..=self.max_jitter_ms)
            };
            let delay = self.backoff(attempt) + Duration::from_millis(jitter);
            warn!(
                attempt,
                max = self.max_retries,
                ?delay,
                error = %err,
                "ask() attempt failed; backing off"
            );
            sleep(delay).await;
        }
    }
}

/// [`AskAsync`] over `awful_aj::api::ask`.
#[derive(Debug)]
pub struct AwfulAsk<'a> {
    pub config: &'a AwfulJadeConfig,
    pub template: &'a ChatTemplate,
}

impl<'a> AskAsync for AwfulAsk<'a> {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        if let Err(e) = &res {
            warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "API call failed");
        }
        res
    }
}

/// LLM client loaded from an `awful_aj` configuration and chat template.
pub struct Summarizer {
    config: AwfulJadeConfig,
    template: ChatTemplate,
}

impl fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer").finish_non_exhaustive()
    }
}

impl Summarizer {
    /// Load `template_name` and the configuration at `config_path`, falling
    /// back to `config.yaml` in the `awful_aj` config directory.
    #[instrument(level = "info", skip_all, fields(%template_name))]
    ///
    /// # Arguments
    ///
    /// * `template_name` - `awful_aj` chat template holding the system prompt
    /// * `config_path` - Explicit `awful_aj` config file, if any
    pub async fn load(
        template_name: &str,
        config_path: Option<&str>,
    ) -> Result<Self, Box<dyn Error>> {
        let template = template::load_template(template_name)
            .await
            .map_err(|e| format!("failed to load template {template_name}: {e}"))?;

        let config_path = match config_path {
            Some(path) => path.to_string(),
            None => config_dir()
                .map_err(|e| e.to_string())?
                .join("config.yaml")
                .to_string_lossy()
                .into_owned(),
        };
        let config = config::load_config(&config_path)
            .map_err(|e| format!("failed to load LLM config {config_path}: {e}"))?;
        info!(%config_path, "Loaded summarizer template and configuration");

        Ok(Self { config, template })
    }

    /// Ask the model for an overview of `content`.
    ///
    /// # Returns
    ///
    /// The model's response, or the last error once five retries are spent.
    #[instrument(level = "info", skip_all, fields(bytes = content.len()))]
    pub async fn summarize(&self, content: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let client = AwfulAsk {
            config: &self.config,
            template: &self.template,
        };
        let res = RetryAsk::new(client, 5, Duration::from_secs(1)).ask(content).await;

        match &res {
            Ok(response) => info!(
                elapsed_ms_total = t0.elapsed().as_millis() as u64,
                response_preview = %truncate_for_log(response, 200),
                "Summary generated"
            ),
            Err(e) => error!(
                elapsed_ms_total = t0.elapsed().as_millis() as u64,
                error = %e,
                "Summarization failed"
            ),
        }
        res
    }
}
