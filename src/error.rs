//! Per-item failure outcomes.
//!
//! Every fallible step of a homepage pass or an article visit resolves to
//! `Result<T, SkipReason>`. A `SkipReason` is never fatal: the pipeline logs
//! it and moves on to the next article (or the next domain).

use thiserror::Error;
use thirtyfour::error::WebDriverError;

/// Why an article (or a whole domain pass) was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The browser session could not be opened for a domain.
    #[error("browser session setup failed: {0}")]
    SessionSetup(String),

    /// Navigating to a page failed.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// A remote script raised or returned something unusable.
    #[error("script execution failed: {0}")]
    Script(String),

    /// An element lookup found nothing.
    #[error("no element matches `{0}`")]
    ElementMissing(String),

    /// A publisher override located its content container but it held no text.
    #[error("publisher override `{0}` found an empty content container")]
    EmptyOverrideContent(&'static str),

    /// Neither the override nor readability produced a body.
    #[error("page has no extractable article body")]
    NoContent,

    /// `document.readyState` never reached `complete`.
    #[error("page did not finish loading within {0} ms")]
    PageLoadTimeout(u64),
}

impl From<WebDriverError> for SkipReason {
    fn from(e: WebDriverError) -> Self {
        SkipReason::Script(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_messages() {
        let e = SkipReason::ElementMissing("section[name=\"articleBody\"]".to_string());
        assert_eq!(
            e.to_string(),
            "no element matches `section[name=\"articleBody\"]`"
        );

        let e = SkipReason::Navigation {
            url: "https://x.com/a".to_string(),
            message: "timeout".to_string(),
        };
        assert!(e.to_string().contains("https://x.com/a"));
        assert!(e.to_string().contains("timeout"));
    }

    #[test]
    fn test_override_reason_names_publisher() {
        let e = SkipReason::EmptyOverrideContent("nytimes");
        assert!(e.to_string().contains("nytimes"));
    }
}
