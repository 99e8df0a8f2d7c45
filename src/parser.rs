//! The parse capability: turn an article page into an [`ArticleRecord`].
//!
//! [`HtmlArticleParser`] fetches the page through any [`Fetcher`] and reads
//! the record out of the markup with [`parse_article_html`]. Metadata is
//! looked up in priority order:
//!
//! | Field | Sources |
//! |-------|---------|
//! | title | JSON-LD `headline`/`name`, `og:title`, `<title>`, first `<h1>` |
//! | authors | JSON-LD `author`, `meta[name=author]`, `article:author` |
//! | publish date | JSON-LD `datePublished`, `article:published_time`, `<time datetime>` |
//! | description | `og:description`, `meta[name=description]`, JSON-LD `description` |
//!
//! Main text is the paragraphs inside `<article>`, falling back to `<main>`
//! and then `<body>`.

use crate::error::ParseError;
use crate::fetch::Fetcher;
use crate::models::ArticleRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Anything that can produce an article record for a URL.
///
/// `Ok(None)` means the page was reachable but held no article.
pub trait ArticleParser {
    /// Fetch `url` within `timeout` and extract its article.
    ///
    /// # Returns
    ///
    /// `Ok(Some(record))` for an article, `Ok(None)` when the page holds none,
    /// or the [`ParseError`] that stopped extraction.
    async fn parse(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Option<ArticleRecord>, ParseError>;
}

/// Parser that downloads a page and extracts the record from its HTML.
#[derive(Debug, Clone)]
pub struct HtmlArticleParser<F> {
    fetcher: F,
}

impl<F: Fetcher> HtmlArticleParser<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F: Fetcher> ArticleParser for HtmlArticleParser<F> {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn parse(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Option<ArticleRecord>, ParseError> {
        let page = self.fetcher.fetch(url, timeout).await?;
        let record = parse_article_html(&page.body);
        debug!(found = record.is_some(), "Parsed article page");
        Ok(record)
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static JSON_LD: Lazy<Selector> = Lazy::new(|| selector(r#"script[type="application/ld+json"]"#));
static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static META_AUTHOR: Lazy<Selector> = Lazy::new(|| {
    selector(r#"meta[name="author"], meta[property="article:author"]"#)
});
static META_PUBLISHED: Lazy<Selector> = Lazy::new(|| {
    selector(r#"meta[property="article:published_time"], meta[itemprop="datePublished"]"#)
});
static TIME: Lazy<Selector> = Lazy::new(|| selector("time[datetime]"));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static CONTAINERS: Lazy<[Selector; 3]> =
    Lazy::new(|| [selector("article"), selector("main"), selector("body")]);

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Extract an article record from raw HTML.
///
/// Returns `None` when no paragraph text can be found.
pub fn parse_article_html(html: &str) -> Option<ArticleRecord> {
    let document = Html::parse_document(html);
    let main_text = main_text(&document)?;
    let ld = json_ld_article(&document);

    let title = ld
        .as_ref()
        .and_then(|v| ld_str(v, "headline").or_else(|| ld_str(v, "name")))
        .or_else(|| meta_content(&document, &OG_TITLE))
        .or_else(|| element_text(&document, &TITLE))
        .or_else(|| element_text(&document, &H1))
        .unwrap_or_default();

    let mut authors = ld.as_ref().map(ld_authors).unwrap_or_default();
    authors.extend(
        document
            .select(&META_AUTHOR)
            .filter_map(|m| m.value().attr("content"))
            .map(collapse_whitespace)
            .filter(|a| !a.is_empty() && !a.starts_with("http")),
    );
    let authors = authors.into_iter().unique().collect();

    let publish_date = ld
        .as_ref()
        .and_then(|v| ld_str(v, "datePublished"))
        .or_else(|| meta_content(&document, &META_PUBLISHED))
        .or_else(|| {
            document
                .select(&TIME)
                .next()
                .and_then(|t| t.value().attr("datetime"))
                .map(str::to_string)
        })
        .and_then(|raw| parse_publish_date(&raw));

    let description = meta_content(&document, &OG_DESCRIPTION)
        .or_else(|| meta_content(&document, &META_DESCRIPTION))
        .or_else(|| ld.as_ref().and_then(|v| ld_str(v, "description")));

    Some(ArticleRecord {
        title,
        authors,
        publish_date,
        description,
        main_text,
    })
}

/// Parse the date formats commonly found in article metadata.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

fn main_text(document: &Html) -> Option<String> {
    CONTAINERS.iter().find_map(|container| {
        let root = document.select(container).next()?;
        let text = root
            .select(&PARAGRAPH)
            .map(|p| collapse_whitespace(&p.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .join("\n");
        (!text.is_empty()).then_some(text)
    })
}

fn meta_content(document: &Html, sel: &Selector) -> Option<String> {
    document
        .select(sel)
        .filter_map(|m| m.value().attr("content"))
        .map(collapse_whitespace)
        .find(|c| !c.is_empty())
}

fn element_text(document: &Html, sel: &Selector) -> Option<String> {
    document
        .select(sel)
        .map(|e| collapse_whitespace(&e.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

fn is_article_type(node: &Value) -> bool {
    let article_like = |t: &str| t.ends_with("Article") || t == "BlogPosting" || t == "Report";
    match node.get("@type") {
        Some(Value::String(t)) => article_like(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(article_like),
        _ => false,
    }
}

fn find_article_node(value: Value) -> Option<Value> {
    if is_article_type(&value) {
        return Some(value);
    }
    match value {
        Value::Array(items) => items.into_iter().find_map(find_article_node),
        Value::Object(mut obj) => obj.remove("@graph").and_then(find_article_node),
        _ => None,
    }
}

fn json_ld_article(document: &Html) -> Option<Value> {
    document.select(&JSON_LD).find_map(|script| {
        let raw = script.text().collect::<String>();
        let raw = raw
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>")
            .trim();
        serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(find_article_node)
    })
}

fn ld_str(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
}

fn ld_authors(node: &Value) -> Vec<String> {
    fn name_of(author: &Value) -> Option<String> {
        match author {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => author.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    let names: Vec<Option<String>> = match node.get("author") {
        Some(Value::Array(authors)) => authors.iter().map(name_of).collect(),
        Some(author) => vec![name_of(author)],
        None => Vec::new(),
    };
    names
        .into_iter()
        .flatten()
        .map(|n| collapse_whitespace(&n))
        .filter(|n| !n.is_empty())
        .collect()
}
