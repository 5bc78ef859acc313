//! # Newsroom Probe
//!
//! Finds article links on news homepages and extracts each article's title,
//! body text and the third-party hosts its page contacts, using a real
//! browser driven over WebDriver.
//!
//! ## Usage
//!
//! ```sh
//! newsroom_probe discover -d news-domains.txt -o news-articles-dump.json
//! newsroom_probe extract -l news-articles-dump.json -o dom-trees-by-domain.json
//! newsroom_probe crawl -d news-domains.txt -o dom-trees-by-domain.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: load each homepage and locate article teasers in its markup
//! 2. **Extraction**: visit each article, pull title and body, record outbound hosts
//! 3. **Output**: write one pretty-printed JSON dump at the end of the pass
//!
//! Failures never stop a run: an article or domain that cannot be processed is
//! logged and skipped, and whatever was collected is written out.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod error;
mod inputs;
mod models;
mod outputs;
mod pipeline;
mod readability;
mod scrapers;
mod utils;

use browser::WebDriverFactory;
use cli::{Cli, Command};
use config::{RunConfig, load_config};
use outputs::json;
use pipeline::Pipeline;
use readability::ReadabilityScript;
use scrapers::article::ArticleExtractor;
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsroom_probe starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = apply_overrides(load_config(args.config.as_deref()).await?, &args);
    debug!(?config, "Effective configuration");

    // Early check: the output location must be writable before any browsing starts
    let output = args.command.output().clone();
    if let Err(e) = ensure_writable_parent(&output).await {
        error!(
            path = %output.display(),
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let pipeline = Pipeline::new(WebDriverFactory::new(&config), config.parallel_domains);

    match &args.command {
        Command::Discover { domains, output } => {
            let domains = inputs::read_domains(domains).await?;
            let (links, _) = pipeline.discover(&domains).await;
            if let Err(e) = json::write_link_set(&links, output).await {
                error!(error = %e, "Failed to write link set");
                return Err(e);
            }
        }
        Command::Extract { links, output } => {
            let extractor = load_extractor(&config).await?;
            let links = inputs::read_link_set(links).await?;
            let (results, _) = pipeline.extract(&extractor, links).await;
            if let Err(e) = json::write_results(&results, output).await {
                error!(error = %e, "Failed to write extraction results");
                return Err(e);
            }
        }
        Command::Crawl { domains, output } => {
            let extractor = load_extractor(&config).await?;
            let domains = inputs::read_domains(domains).await?;
            let (results, _) = pipeline.crawl(&extractor, &domains).await;
            if let Err(e) = json::write_results(&results, output).await {
                error!(error = %e, "Failed to write extraction results");
                return Err(e);
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

/// Load the readability script once for the whole run.
async fn load_extractor(config: &RunConfig) -> Result<ArticleExtractor, Box<dyn Error>> {
    let readability = ReadabilityScript::load(&config.readability).await?;
    Ok(ArticleExtractor::new(readability, config))
}

/// Layer command-line values over the file configuration.
fn apply_overrides(mut config: RunConfig, args: &Cli) -> RunConfig {
    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if let Some(readability) = &args.readability {
        config.readability = readability.clone();
    }
    if let Some(n) = args.parallel_domains {
        config.parallel_domains = n.max(1);
    }
    config
}
