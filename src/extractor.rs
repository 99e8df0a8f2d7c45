//! Per-candidate article extraction.
//!
//! Every candidate yields exactly one [`ExtractionOutcome`]. Candidates are
//! processed on a bounded pool of in-flight futures and may complete in any
//! order; results are put back in submission order by index before they are
//! returned.

use crate::error::ParseError;
use crate::models::{CandidateLink, ExtractionOutcome};
use crate::parser::ArticleParser;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Per-call budget for fetching and parsing one page.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of candidates extracted at the same time.
pub const DEFAULT_CONCURRENCY: usize = 12;

/// Failure reason used when the parser gives no cause.
pub const GENERIC_FAILURE: &str = "extraction failed";

/// Extract every candidate, one outcome per candidate, in input order.
///
/// A failing candidate never affects the others.
#[instrument(level = "info", skip_all, fields(candidates = candidates.len()))]
pub async fn extract<P: ArticleParser>(
    parser: &P,
    candidates: &[CandidateLink],
    timeout: Duration,
    concurrency: usize,
) -> Vec<ExtractionOutcome> {
    info!(count = candidates.len(), "Extracting articles");

    let mut indexed: Vec<(usize, ExtractionOutcome)> = stream::iter(candidates.iter().enumerate())
        .map(|(i, candidate)| async move { (i, extract_one(parser, i, candidate, timeout).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    indexed.sort_unstable_by_key(|(i, _)| *i);

    let outcomes: Vec<ExtractionOutcome> = indexed.into_iter().map(|(_, o)| o).collect();
    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        total = outcomes.len(),
        succeeded,
        failed = outcomes.len() - succeeded,
        "Extraction complete"
    );
    outcomes
}

async fn extract_one<P: ArticleParser>(
    parser: &P,
    index: usize,
    candidate: &CandidateLink,
    timeout: Duration,
) -> ExtractionOutcome {
    let url = candidate.url.clone();
    let result = tokio::time::timeout(timeout, parser.parse(&url, timeout)).await;
    let reason = match result {
        Ok(Ok(Some(record))) if record.has_main_text() => {
            info!(index, %url, title = %record.title, "Extracted article");
            return ExtractionOutcome::Success { url, record };
        }
        Ok(Ok(Some(_))) => "article has no main text".to_string(),
        Ok(Ok(None)) => GENERIC_FAILURE.to_string(),
        Ok(Err(e)) => e.to_string(),
        Err(_) => ParseError::Timeout(timeout).to_string(),
    };

    warn!(index, %url, %reason, "Failed to extract article");
    ExtractionOutcome::Failure { url, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::ArticleRecord;
    use std::collections::HashMap;

    /// How the fake parser should answer for a URL.
    enum Script {
        Article { text: &'static str, delay_ms: u64 },
        Missing,
        Fails(u16),
        Hangs,
    }

    struct ScriptedParser(HashMap<&'static str, Script>);

    impl ArticleParser for ScriptedParser {
        async fn parse(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> Result<Option<ArticleRecord>, ParseError> {
            match self.0.get(url) {
                Some(Script::Article { text, delay_ms }) => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    Ok(Some(ArticleRecord {
                        title: format!("Title of {url}"),
                        main_text: text.to_string(),
                        ..Default::default()
                    }))
                }
                Some(Script::Missing) | None => Ok(None),
                Some(Script::Fails(status)) => Err(FetchError::Status(*status).into()),
                Some(Script::Hangs) => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(None)
                }
            }
        }
    }

    fn candidates(urls: &[&str]) -> Vec<CandidateLink> {
        urls.iter()
            .map(|u| CandidateLink {
                url: u.to_string(),
                source_seed: "https://example.com/".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_extract_preserves_submission_order() {
        // Earlier candidates finish last.
        let parser = ScriptedParser(HashMap::from([
            ("https://example.com/1", Script::Article { text: "one", delay_ms: 60 }),
            ("https://example.com/2", Script::Article { text: "two", delay_ms: 30 }),
            ("https://example.com/3", Script::Article { text: "three", delay_ms: 0 }),
        ]));
        let input = candidates(&[
            "https://example.com/1",
            "https://example.com/2",
            "https://example.com/3",
        ]);

        let outcomes = extract(&parser, &input, DEFAULT_TIMEOUT, 3).await;
        assert_eq!(outcomes.len(), 3);
        for (candidate, outcome) in input.iter().zip(&outcomes) {
            assert_eq!(candidate.url, outcome.url());
            assert!(outcome.is_success());
        }
    }

    #[tokio::test]
    async fn test_extract_tolerates_independent_failures() {
        let parser = ScriptedParser(HashMap::from([
            ("https://example.com/a", Script::Article { text: "alpha", delay_ms: 0 }),
            ("https://example.com/b", Script::Fails(503)),
            ("https://example.com/c", Script::Article { text: "gamma", delay_ms: 0 }),
        ]));
        let input = candidates(&[
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/c",
        ]);

        let outcomes = extract(&parser, &input, DEFAULT_TIMEOUT, DEFAULT_CONCURRENCY).await;
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 2);
        assert_eq!(
            outcomes[1],
            ExtractionOutcome::Failure {
                url: "https://example.com/b".to_string(),
                reason: "request failed with status 503".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_record_and_empty_text_are_failures() {
        let parser = ScriptedParser(HashMap::from([
            ("https://example.com/none", Script::Missing),
            ("https://example.com/blank", Script::Article { text: "  \n", delay_ms: 0 }),
        ]));
        let input = candidates(&["https://example.com/none", "https://example.com/blank"]);

        let outcomes = extract(&parser, &input, DEFAULT_TIMEOUT, 2).await;
        match &outcomes[0] {
            ExtractionOutcome::Failure { reason, .. } => assert_eq!(reason, GENERIC_FAILURE),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_timeout_is_an_ordinary_failure() {
        let parser = ScriptedParser(HashMap::from([
            ("https://example.com/slow", Script::Hangs),
            ("https://example.com/fast", Script::Article { text: "quick", delay_ms: 0 }),
        ]));
        let input = candidates(&["https://example.com/slow", "https://example.com/fast"]);

        let outcomes = extract(&parser, &input, Duration::from_millis(50), 2).await;
        match &outcomes[0] {
            ExtractionOutcome::Failure { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("expected timeout failure, got {other:?}"),
        }
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_extract_with_no_candidates() {
        let parser = ScriptedParser(HashMap::new());
        let outcomes = extract(&parser, &[], DEFAULT_TIMEOUT, DEFAULT_CONCURRENCY).await;
        assert!(outcomes.is_empty());
    }
}
