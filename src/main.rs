//! # News Digest
//!
//! Command-line front end for the `news_digest` pipeline: crawl seed pages,
//! extract the linked articles, print the assembled document, and optionally
//! have an LLM summarize it.
//!
//! ## Usage
//!
//! ```sh
//! news_digest https://www.br.de/nachrichten https://www.t-online.de/nachrichten \
//!     -n 3 -r "Loading..."
//! ```
//!
//! Logs go to stderr so stdout carries only the document and the summary.

use clap::Parser;
use news_digest::summarize::Summarizer;
use news_digest::utils::{ensure_writable_parent, write_output};
use news_digest::{Pipeline, PipelineConfig, publish, publish_error, publish_info};
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[cfg_attr(not(feature = "publish"), allow(dead_code))]
const SERVICE: &str = "news_digest";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    publish::init(args.amqp_url.as_deref(), &args.message_bus_exchange).await;

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path).await?,
        None => PipelineConfig::default(),
    };
    args.apply_to(&mut config);

    if let Some(path) = &args.output {
        if let Err(e) = ensure_writable_parent(path).await {
            error!(
                %path,
                error = %e,
                "Output location is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Crawl, extract, assemble ----
    let pipeline = Pipeline::from_config(config)?;
    let digest = pipeline.run().await?;
    info!(
        candidates = digest.candidates,
        extracted = digest.extracted,
        seeds_failed = digest.seeds_failed,
        "Document assembled"
    );

    match &args.output {
        Some(path) => {
            if let Err(e) = write_output(path, &digest.content).await {
                error!(%path, error = %e, "Failed to write document");
                return Err(e);
            }
        }
        None => {
            println!("=== EXTRACTED CONTENT ===");
            println!("{}", digest.content);
            println!("=========================");
        }
    }

    // ---- Summarize ----
    if args.summarize {
        if digest.extracted == 0 {
            warn!("Nothing was extracted; skipping summarization");
        } else {
            let summarizer = Summarizer::load(&args.template, args.llm_config.as_deref()).await?;
            match summarizer.summarize(&digest.content).await {
                Ok(response) => {
                    publish_info!(
                        SERVICE,
                        event_kind = "summary.completed",
                        bytes = response.len(),
                        "Summary generated"
                    );
                    println!("=== MODEL RESPONSE ===");
                    println!("{response}");
                    println!("======================");
                }
                Err(e) => {
                    publish_error!(
                        SERVICE,
                        event_kind = "summary.failed",
                        reason = e.to_string(),
                        "Summarization failed"
                    );
                    return Err(e);
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
