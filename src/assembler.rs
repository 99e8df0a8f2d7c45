//! Rendering of extraction outcomes into the final text corpus.
//!
//! Assembly happens in two steps. First the outcomes become a [`Document`],
//! an ordered list of typed [`Block`]s. Then the document is rendered to text
//! and the redactions are removed.
//!
//! # Block Format
//!
//! ```text
//! [FRAMEWORK] ARTICLE 1 BEGIN
//! Title: Council approves new bridge
//! Authors: Jane Doe, Max Muster
//! Date: 2025-05-06 14:30:00
//! Description: The vote ends a decade of debate.
//! Text:
//! The city council voted on Tuesday.
//! [FRAMEWORK] ARTICLE 1 END
//!
//! [FRAMEWORK] ERROR: Failed to extract article 2 from https://example.com/b
//!
//! ```

use crate::models::{ArticleRecord, ExtractionOutcome, SeedFailure};
use std::fmt::Write;

/// Placeholder for missing authors, dates and descriptions.
pub const MISSING: &str = "N/A";

/// Separator between author names.
pub const AUTHOR_SEPARATOR: &str = ", ";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One rendered unit of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A seed page that could not be crawled, numbered by seed position.
    SeedFailure { position: usize, url: String },
    /// A successfully extracted article, numbered by outcome position.
    Article { sequence: usize, record: ArticleRecord },
    /// A candidate that could not be extracted, numbered by outcome position.
    ExtractionFailure { sequence: usize, url: String },
}

/// Ordered sequence of blocks handed to the summarizer once rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks in render order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Record seeds that yielded no candidates because their page failed.
    pub fn push_seed_failures(&mut self, failures: &[SeedFailure]) {
        self.blocks.extend(failures.iter().map(|f| Block::SeedFailure {
            position: f.position,
            url: f.url.clone(),
        }));
    }

    /// Append one block per outcome, numbered from 1 in the given order.
    pub fn push_outcomes(&mut self, outcomes: Vec<ExtractionOutcome>) {
        self.blocks
            .extend(outcomes.into_iter().enumerate().map(|(i, outcome)| {
                let sequence = i + 1;
                match outcome {
                    ExtractionOutcome::Success { record, .. } => {
                        Block::Article { sequence, record }
                    }
                    ExtractionOutcome::Failure { url, .. } => {
                        Block::ExtractionFailure { sequence, url }
                    }
                }
            }));
    }

    /// Render every block in order, without redaction.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            render_block(&mut out, block);
        }
        out
    }
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::SeedFailure { position, url } => {
            writeln!(
                out,
                "[FRAMEWORK] ERROR: Failed to crawl site {position} from {url}\n"
            )
            .unwrap();
        }
        Block::ExtractionFailure { sequence, url } => {
            writeln!(
                out,
                "[FRAMEWORK] ERROR: Failed to extract article {sequence} from {url}\n"
            )
            .unwrap();
        }
        Block::Article { sequence, record } => {
            let authors = if record.authors.is_empty() {
                MISSING.to_string()
            } else {
                record.authors.join(AUTHOR_SEPARATOR)
            };
            let date = record
                .publish_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| MISSING.to_string());
            let description = record.description.as_deref().unwrap_or(MISSING);

            writeln!(out, "[FRAMEWORK] ARTICLE {sequence} BEGIN").unwrap();
            writeln!(out, "Title: {}", record.title).unwrap();
            writeln!(out, "Authors: {authors}").unwrap();
            writeln!(out, "Date: {date}").unwrap();
            writeln!(out, "Description: {description}").unwrap();
            writeln!(out, "Text:\n{}", record.main_text).unwrap();
            writeln!(out, "[FRAMEWORK] ARTICLE {sequence} END\n").unwrap();
        }
    }
}

/// Remove every occurrence of each redaction, in order, as literal text.
///
/// Empty redaction strings are ignored.
pub fn redact(text: &str, redactions: &[String]) -> String {
    redactions
        .iter()
        .filter(|r| !r.is_empty())
        .fold(text.to_string(), |acc, r| acc.replace(r.as_str(), ""))
}

/// Render `outcomes` into a single document and strip `redactions` from it.
///
/// # Arguments
///
/// * `outcomes` - Extraction outcomes in candidate order
/// * `redactions` - Literal strings to remove, applied in order
///
/// # Returns
///
/// The rendered text. Articles are numbered from 1 by their position in
/// `outcomes`, whether or not earlier outcomes failed.
pub fn assemble(outcomes: Vec<ExtractionOutcome>, redactions: &[String]) -> String {
    let mut document = Document::new();
    document.push_outcomes(outcomes);
    redact(&document.render(), redactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str, text: &str) -> ExtractionOutcome {
        ExtractionOutcome::Success {
            url: format!("https://example.com/{}", title.to_lowercase()),
            record: ArticleRecord {
                title: title.to_string(),
                main_text: text.to_string(),
                ..Default::default()
            },
        }
    }

    fn failure(url: &str) -> ExtractionOutcome {
        ExtractionOutcome::Failure {
            url: url.to_string(),
            reason: "extraction failed".to_string(),
        }
    }

    #[test]
    fn test_article_block_format() {
        let outcome = ExtractionOutcome::Success {
            url: "https://example.com/bridge".to_string(),
            record: ArticleRecord {
                title: "Council approves new bridge".to_string(),
                authors: vec!["Jane Doe".to_string(), "Max Muster".to_string()],
                publish_date: NaiveDate::from_ymd_opt(2025, 5, 6)
                    .unwrap()
                    .and_hms_opt(14, 30, 0),
                description: Some("The vote ends a decade of debate.".to_string()),
                main_text: "The city council voted on Tuesday.".to_string(),
            },
        };

        let text = assemble(vec![outcome], &[]);
        assert_eq!(
            text,
            "[FRAMEWORK] ARTICLE 1 BEGIN\n\
             Title: Council approves new bridge\n\
             Authors: Jane Doe, Max Muster\n\
             Date: 2025-05-06 14:30:00\n\
             Description: The vote ends a decade of debate.\n\
             Text:\n\
             The city council voted on Tuesday.\n\
             [FRAMEWORK] ARTICLE 1 END\n\n"
        );
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let text = assemble(vec![article("Bare", "Body")], &[]);
        assert!(text.contains("Authors: N/A\n"));
        assert!(text.contains("Date: N/A\n"));
        assert!(text.contains("Description: N/A\n"));
    }

    #[test]
    fn test_partial_failure_document() {
        let outcomes = vec![
            article("First", "one"),
            failure("https://example.com/second"),
            article("Third", "three"),
        ];

        let text = assemble(outcomes, &[]);
        assert_eq!(text.matches(" BEGIN\n").count(), 2);
        assert_eq!(text.matches("[FRAMEWORK] ERROR:").count(), 1);
        assert!(text.contains("[FRAMEWORK] ARTICLE 1 BEGIN"));
        assert!(text.contains(
            "[FRAMEWORK] ERROR: Failed to extract article 2 from https://example.com/second\n"
        ));
        assert!(text.contains("[FRAMEWORK] ARTICLE 3 END"));
        assert!(!text.contains("ARTICLE 2 BEGIN"));
    }

    #[test]
    fn test_blocks_follow_outcome_order() {
        let mut document = Document::new();
        document.push_outcomes(vec![failure("https://example.com/x"), article("Y", "y")]);
        assert!(matches!(
            document.blocks(),
            [
                Block::ExtractionFailure { sequence: 1, .. },
                Block::Article { sequence: 2, .. }
            ]
        ));
    }

    #[test]
    fn test_seed_failures_render_before_articles() {
        let mut document = Document::new();
        document.push_seed_failures(&[SeedFailure {
            position: 2,
            url: "https://down.example.org/".to_string(),
            reason: "request failed with status 500".to_string(),
        }]);
        document.push_outcomes(vec![article("Only", "text")]);

        let text = document.render();
        assert!(text.starts_with(
            "[FRAMEWORK] ERROR: Failed to crawl site 2 from https://down.example.org/\n\n"
        ));
        assert!(text.contains("[FRAMEWORK] ARTICLE 1 BEGIN"));
    }

    #[test]
    fn test_redaction_removes_every_occurrence() {
        let outcomes = vec![
            article("A", "Loading... first"),
            article("B", "second Loading...Loading..."),
        ];
        let text = assemble(outcomes, &["Loading...".to_string()]);
        assert_eq!(text.matches("Loading...").count(), 0);
        assert!(text.contains("Text:\n first\n"));
    }

    #[test]
    fn test_redaction_is_literal_and_ordered() {
        let redactions = vec!["a.c".to_string(), "XY".to_string(), String::new()];
        assert_eq!(redact("abc a.c XXa.cYY", &redactions), "abc  XY");
    }

    #[test]
    fn test_no_outcomes_yield_empty_document() {
        assert_eq!(assemble(Vec::new(), &["Loading...".to_string()]), "");
    }
}
