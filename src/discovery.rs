//! Link discovery on seed pages.
//!
//! Discovery is split in two so the policy can be tested without a network:
//!
//! 1. [`discover`] is a pure function over already-fetched HTML: select
//!    anchors, resolve, filter, dedup in first-seen order, cap.
//! 2. [`discover_seed`] fetches the seed page and degrades any fetch failure
//!    to an empty candidate list.

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::filter::is_eligible;
use crate::models::{CandidateLink, SeedSite};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Extract up to `max_articles` eligible, unique links from a seed page.
///
/// Links keep the order in which they first appear in the document.
///
/// # Arguments
///
/// * `seed` - The crawled seed; relative links resolve against its URL
/// * `fetched_html` - The seed page's HTML
/// * `max_articles` - Cap applied after filtering and dedup
///
/// # Returns
///
/// At most `max_articles` candidates on the seed's host.
pub fn discover(seed: &SeedSite, fetched_html: &str, max_articles: usize) -> Vec<CandidateLink> {
    let document = Html::parse_document(fetched_html);
    let domain = seed.domain();

    let mut seen: HashSet<String> = HashSet::new();
    let mut links: Vec<CandidateLink> = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = seed.url().join(href.trim()) else {
            continue;
        };
        let resolved = resolved.to_string();

        if !is_eligible(&resolved, domain) {
            continue;
        }
        if seen.insert(resolved.clone()) {
            links.push(CandidateLink {
                url: resolved,
                source_seed: seed.url().to_string(),
            });
        }
    }

    debug!(
        seed = %seed.url(),
        unique = links.len(),
        "Collected eligible links"
    );
    links.truncate(max_articles);
    links
}

/// Fetch `seed` and discover candidate links on it.
///
/// A failed fetch is logged and returned as `Err` so the caller can record it;
/// it never aborts the crawl of other seeds.
#[instrument(level = "info", skip_all, fields(seed = %seed.url()))]
pub async fn discover_seed<F: Fetcher>(
    fetcher: &F,
    seed: &SeedSite,
    max_articles: usize,
    timeout: Duration,
) -> Result<Vec<CandidateLink>, FetchError> {
    info!("Crawling seed for latest articles");
    match fetcher.fetch(seed.url().as_str(), timeout).await {
        Ok(page) => {
            let links = discover(seed, &page.body, max_articles);
            info!(count = links.len(), "Found potential article links");
            Ok(links)
        }
        Err(e) => {
            warn!(error = %e, "Failed to crawl seed; skipping");
            Err(e)
        }
    }
}
