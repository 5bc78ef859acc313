//! Run configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Command-line flags are applied on top in `main`.
//!
//! ```yaml
//! webdriver_url: http://localhost:4444
//! browser: firefox
//! headless: true
//! settle_delay_ms: 1000
//! parallel_domains: 2
//! readability: ./Readability.js
//! ```

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Which browser the WebDriver server should launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Firefox,
    Chrome,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// WebDriver endpoint (geckodriver, chromedriver or a Selenium hub).
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// Interval between `document.readyState` polls.
    pub page_load_poll_ms: u64,
    /// Give up waiting for `document.readyState === 'complete'` after this long.
    pub page_load_max_wait_ms: u64,
    /// Fixed pause after page load so deferred sub-resource fetches get recorded.
    pub settle_delay_ms: u64,
    /// How many domains may be processed at once, each with its own session.
    pub parallel_domains: usize,
    /// Path or URL of the readability script.
    pub readability: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            browser: BrowserKind::Firefox,
            headless: true,
            page_load_poll_ms: 250,
            page_load_max_wait_ms: 30_000,
            settle_delay_ms: 1_000,
            parallel_domains: 1,
            readability: "./Readability.js".to_string(),
        }
    }
}

impl RunConfig {
    pub fn page_load_poll(&self) -> Duration {
        Duration::from_millis(self.page_load_poll_ms.max(1))
    }

    pub fn page_load_max_wait(&self) -> Duration {
        Duration::from_millis(self.page_load_max_wait_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Parse a YAML configuration document.
pub fn parse_config(yaml: &str) -> Result<RunConfig, Box<dyn Error>> {
    if yaml.trim().is_empty() {
        return Ok(RunConfig::default());
    }
    let mut config: RunConfig = serde_yaml::from_str(yaml)?;
    config.parallel_domains = config.parallel_domains.max(1);
    Ok(config)
}

/// Load the configuration file at `path`, or the defaults when `path` is `None`.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&Path>) -> Result<RunConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(RunConfig::default());
    };
    let yaml = tokio::fs::read_to_string(path).await?;
    let config = parse_config(&yaml)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.browser, BrowserKind::Firefox);
        assert_eq!(config.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.parallel_domains, 1);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse_config(
            "browser: chrome\nsettle_delay_ms: 2500\nreadability: https://cdn.example.com/Readability.js\n",
        )
        .unwrap();
        assert_eq!(config.browser, BrowserKind::Chrome);
        assert_eq!(config.settle_delay_ms, 2500);
        assert_eq!(config.readability, "https://cdn.example.com/Readability.js");
        assert!(config.headless);
        assert_eq!(config.page_load_poll_ms, 250);
    }

    #[test]
    fn test_zero_parallelism_is_clamped() {
        let config = parse_config("parallel_domains: 0\n").unwrap();
        assert_eq!(config.parallel_domains, 1);
    }

    #[test]
    fn test_unknown_browser_is_rejected() {
        assert!(parse_config("browser: netscape\n").is_err());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.yaml");
        tokio::fs::write(&path, "webdriver_url: http://grid:4444/wd/hub\n")
            .await
            .unwrap();
        let config = load_config(Some(&path)).await.unwrap();
        assert_eq!(config.webdriver_url, "http://grid:4444/wd/hub");
    }
}
