//! Command-line interface definitions for News Digest.
//!
//! Every pipeline setting can also come from a YAML file passed with
//! `--config`; flags given on the command line win over the file.

use clap::Parser;
use news_digest::PipelineConfig;

/// Command-line arguments for the News Digest application.
///
/// # Examples
///
/// ```sh
/// # Three articles from each of two sites, stripping a loading placeholder
/// news_digest https://www.br.de/nachrichten https://www.t-online.de/nachrichten \
///     -n 3 -r "Loading..."
///
/// # Seeds from a file, document written to disk, then summarized
/// news_digest -c digest.yaml -o ./out/digest.txt --summarize --template news_digest
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Seed pages to crawl for article links
    pub seeds: Vec<String>,

    /// Optional path to a pipeline config.yaml
    #[arg(short, long, env = "NEWS_DIGEST_CONFIG")]
    pub config: Option<String>,

    /// Maximum number of articles taken from each seed page
    #[arg(short = 'n', long)]
    pub max_articles_per_site: Option<usize>,

    /// Literal text to remove from the document (repeatable)
    #[arg(short = 'r', long = "redact")]
    pub redactions: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of pages fetched at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Send the document to the LLM for a summary
    #[arg(long)]
    pub summarize: bool,

    /// awful_aj chat template holding the summarizer's system prompt
    #[arg(long, default_value = "news_digest")]
    pub template: String,

    /// Path to the awful_aj config.yaml (defaults to its config directory)
    #[arg(long, env = "AWFUL_AJ_CONFIG")]
    pub llm_config: Option<String>,

    /// AMQP URL for message bus (enables event publishing with the `publish` feature)
    #[arg(long, env = "AMQP_URL")]
    pub amqp_url: Option<String>,

    /// Message bus exchange name (only used when `publish` feature is enabled)
    #[arg(long, env = "MESSAGE_BUS_EXCHANGE", default_value = "events")]
    pub message_bus_exchange: String,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if !self.seeds.is_empty() {
            config.seeds = self.seeds.clone();
        }
        if let Some(n) = self.max_articles_per_site {
            config.max_articles_per_site = n;
        }
        if !self.redactions.is_empty() {
            config.redactions = self.redactions.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_digest",
            "https://www.br.de/nachrichten",
            "https://www.t-online.de/nachrichten",
            "--max-articles-per-site",
            "3",
            "--redact",
            "Loading...",
        ]);

        assert_eq!(cli.seeds.len(), 2);
        assert_eq!(cli.max_articles_per_site, Some(3));
        assert_eq!(cli.redactions, vec!["Loading..."]);
        assert!(!cli.summarize);
        assert_eq!(cli.template, "news_digest");
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_digest",
            "-c",
            "/tmp/digest.yaml",
            "-n",
            "2",
            "-r",
            "Loading...",
            "-r",
            "Anzeige",
            "-o",
            "/tmp/digest.txt",
        ]);

        assert_eq!(cli.config.as_deref(), Some("/tmp/digest.yaml"));
        assert_eq!(cli.redactions, vec!["Loading...", "Anzeige"]);
        assert_eq!(cli.output.as_deref(), Some("/tmp/digest.txt"));
        assert!(cli.seeds.is_empty());
    }

    #[test]
    fn test_flags_override_file_settings() {
        let mut config = PipelineConfig {
            seeds: vec!["https://from-file.example.com".into()],
            redactions: vec!["Werbung".into()],
            ..Default::default()
        };
        let cli = Cli::parse_from(["news_digest", "-n", "4", "--timeout-secs", "20"]);
        cli.apply_to(&mut config);

        assert_eq!(config.seeds, vec!["https://from-file.example.com"]);
        assert_eq!(config.redactions, vec!["Werbung"]);
        assert_eq!(config.max_articles_per_site, 4);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.concurrency, 12);
    }
}
