//! # News Digest
//!
//! Crawls a set of news seed pages, extracts the articles they link to, and
//! assembles everything into one sanitized text corpus for an LLM to
//! summarize.
//!
//! ## Architecture
//!
//! 1. **Discovery**: Fetch each seed page, keep same-site article links
//!    ([`filter`], [`discovery`])
//! 2. **Extraction**: Fetch and parse every candidate, one outcome each
//!    ([`parser`], [`extractor`])
//! 3. **Assembly**: Render outcomes into numbered blocks and strip
//!    boilerplate ([`assembler`])
//! 4. **Summarization** (optional): Send the document to an LLM ([`summarize`])
//!
//! Failures of single seeds or articles never abort a run. They show up as
//! numbered error lines in the document.
//!
//! ## Usage
//!
//! ```ignore
//! let seeds = vec!["https://www.br.de/nachrichten".to_string()];
//! let document = news_digest::run_pipeline(&seeds, 3, &["Loading...".to_string()]).await?;
//! ```

pub mod assembler;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod publish;
pub mod summarize;
pub mod utils;

pub use assembler::{Document, assemble};
pub use config::PipelineConfig;
pub use discovery::discover;
pub use error::{ConfigError, FetchError, ParseError};
pub use extractor::extract;
pub use filter::is_eligible;
pub use models::{ArticleRecord, CandidateLink, ExtractionOutcome, SeedSite};
pub use pipeline::{Digest, Pipeline, run_pipeline};
