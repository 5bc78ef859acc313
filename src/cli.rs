//! Command-line interface definitions for Newsroom Probe.
//!
//! Global options can also come from environment variables or the YAML
//! config file; flags win over both.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Newsroom Probe application.
///
/// # Examples
///
/// ```sh
/// # Find article links on each homepage
/// newsroom_probe discover -d news-domains.txt -o news-articles-dump.json
///
/// # Extract every article from a saved link set
/// newsroom_probe extract -l news-articles-dump.json -o dom-trees-by-domain.json
///
/// # Both in one pass, two domains at a time
/// newsroom_probe --parallel-domains 2 crawl -d news-domains.txt -o dom-trees-by-domain.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (geckodriver, chromedriver or a Selenium hub)
    #[arg(long, env = "WEBDRIVER_URL", global = true)]
    pub webdriver_url: Option<String>,

    /// Path or URL of Readability.js
    #[arg(long, env = "READABILITY_JS", global = true)]
    pub readability: Option<String>,

    /// Number of domains processed at once, each with its own browser
    #[arg(long, global = true)]
    pub parallel_domains: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape each homepage for article links
    Discover {
        /// Newline-delimited list of domains
        #[arg(short, long)]
        domains: PathBuf,

        /// Where to write the `{ domain: [url] }` link set
        #[arg(short, long, default_value = "news-articles-dump.json")]
        output: PathBuf,
    },

    /// Extract articles from a previously discovered link set
    Extract {
        /// JSON link set written by `discover`
        #[arg(short, long)]
        links: PathBuf,

        /// Where to write the extraction results
        #[arg(short, long, default_value = "dom-trees-by-domain.json")]
        output: PathBuf,
    },

    /// Discover and extract in one pass
    Crawl {
        /// Newline-delimited list of domains
        #[arg(short, long)]
        domains: PathBuf,

        /// Where to write the extraction results
        #[arg(short, long, default_value = "dom-trees-by-domain.json")]
        output: PathBuf,
    },
}

impl Command {
    pub fn output(&self) -> &PathBuf {
        match self {
            Command::Discover { output, .. }
            | Command::Extract { output, .. }
            | Command::Crawl { output, .. } => output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_discover() {
        let cli = Cli::parse_from([
            "newsroom_probe",
            "discover",
            "--domains",
            "news-domains.txt",
        ]);
        match cli.command {
            Command::Discover { domains, output } => {
                assert_eq!(domains, PathBuf::from("news-domains.txt"));
                assert_eq!(output, PathBuf::from("news-articles-dump.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_extract_short_flags() {
        let cli = Cli::parse_from([
            "newsroom_probe",
            "extract",
            "-l",
            "/tmp/links.json",
            "-o",
            "/tmp/out.json",
        ]);
        assert_eq!(cli.command.output(), &PathBuf::from("/tmp/out.json"));
        assert!(matches!(cli.command, Command::Extract { .. }));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "newsroom_probe",
            "crawl",
            "-d",
            "domains.txt",
            "--parallel-domains",
            "3",
            "--webdriver-url",
            "http://grid:4444",
        ]);
        assert_eq!(cli.parallel_domains, Some(3));
        assert_eq!(cli.webdriver_url.as_deref(), Some("http://grid:4444"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["newsroom_probe"]).is_err());
    }
}
