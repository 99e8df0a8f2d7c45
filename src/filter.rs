//! Eligibility rules for links discovered on a seed page.
//!
//! A candidate must stay on the seed's exact host and must not look like a
//! navigation or listing page (anchors, script links, tag/category/author
//! indexes).

use url::Url;

/// Substrings that mark a URL as navigation rather than an article.
pub const EXCLUDED_MARKERS: [&str; 6] = [
    "#",
    "javascript:",
    "mailto:",
    "/tag/",
    "/category/",
    "/author/",
];

/// Decide whether `candidate_url` is worth extracting for a seed on `seed_domain`.
///
/// Host comparison is exact, so `news.example.com` is not eligible for a
/// seed on `example.com`. Marker matching is case-insensitive.
pub fn is_eligible(candidate_url: &str, seed_domain: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate_url) else {
        return false;
    };
    if parsed.host_str() != Some(seed_domain) {
        return false;
    }

    let lowered = candidate_url.to_lowercase();
    !EXCLUDED_MARKERS.iter().any(|marker| lowered.contains(marker))
}
