//! The readability script, loaded once per process.
//!
//! The source comes from a local file or, when the location is an
//! `http(s)://` URL, is downloaded with `reqwest`. It is then shared read-only
//! by every article visit.

use std::error::Error;
use std::sync::Arc;
use tracing::{info, instrument};

/// Script run in the page after injection to extract the article.
pub const READABILITY_PARSE_SCRIPT: &str =
    "return new Readability(document.cloneNode(true)).parse();";

/// Readability source plus the suffix that publishes it on `window`.
#[derive(Debug, Clone)]
pub struct ReadabilityScript {
    injection: Arc<str>,
}

impl ReadabilityScript {
    /// Wrap raw readability source.
    ///
    /// WebDriver runs scripts inside a function body, so the constructor is
    /// assigned to `window` to survive into later script calls.
    pub fn from_source(source: &str) -> Result<Self, Box<dyn Error>> {
        if source.trim().is_empty() {
            return Err("readability script is empty".into());
        }
        let injection = format!("{source}\n;window.Readability = Readability;");
        Ok(Self {
            injection: Arc::from(injection),
        })
    }

    /// Read the script from a path or fetch it from a URL.
    #[instrument(level = "info")]
    pub async fn load(location: &str) -> Result<Self, Box<dyn Error>> {
        let source = if location.starts_with("http://") || location.starts_with("https://") {
            reqwest::get(location).await?.error_for_status()?.text().await?
        } else {
            tokio::fs::read_to_string(location).await?
        };
        let script = Self::from_source(&source)?;
        info!(bytes = source.len(), "Loaded readability script");
        Ok(script)
    }

    /// Script to execute in a page to make `Readability` available.
    pub fn injection(&self) -> &str {
        &self.injection
    }
}
