//! Article extraction orchestrator.
//!
//! One call to [`ArticleExtractor::extract`] visits one article page and
//! either returns a complete [`ExtractionResult`] or a [`SkipReason`]. There
//! is no partial result: any failing step abandons the article.
//!
//! # Sequence
//!
//! 1. Navigate to the article.
//! 2. If a [`PublisherOverride`] matches the domain, wait for load and read the
//!    body from its selector. A missing or empty container skips the article.
//! 3. Stamp the capture time.
//! 4. Inject readability.
//! 5. Title: `og:title`, then `<title>`.
//! 6. Run readability; its text is the body unless an override already set
//!    one, and its title is the last title fallback.
//! 7. No body at this point skips the article.
//! 8. Wait for load, settle, collect outbound hosts.

use super::outbound;
use super::overrides::{self, PublisherOverride};
use crate::browser::BrowserSession;
use crate::config::RunConfig;
use crate::error::SkipReason;
use crate::models::ExtractionResult;
use crate::readability::{READABILITY_PARSE_SCRIPT, ReadabilityScript};
use crate::utils::truncate_for_log;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

const OG_TITLE_SELECTOR: &str = r#"meta[property="og:title"]"#;
const TITLE_SELECTOR: &str = "title";

/// What `Readability.parse()` hands back (the fields used here).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadabilityArticle {
    title: Option<String>,
    text_content: Option<String>,
}

/// Runs the extraction sequence with process-wide settings.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    readability: ReadabilityScript,
    page_load_poll: Duration,
    page_load_max_wait: Duration,
    settle_delay: Duration,
}

impl ArticleExtractor {
    pub fn new(readability: ReadabilityScript, config: &RunConfig) -> Self {
        Self {
            readability,
            page_load_poll: config.page_load_poll(),
            page_load_max_wait: config.page_load_max_wait(),
            settle_delay: config.settle_delay(),
        }
    }

    /// Visit `url` (an article of `domain`) and extract its content.
    ///
    /// # Arguments
    ///
    /// * `session` - Browser session to navigate; it is left on the article page
    /// * `url` - Absolute article URL
    /// * `domain` - Domain the article was listed under, matched against the
    ///   publisher overrides
    ///
    /// # Returns
    ///
    /// A complete [`ExtractionResult`], or the [`SkipReason`] of the first step
    /// that failed.
    #[instrument(level = "info", skip(self, session))]
    pub async fn extract<S: BrowserSession>(
        &self,
        session: &S,
        url: &str,
        domain: &str,
    ) -> Result<ExtractionResult, SkipReason> {
        session.goto(url).await?;

        let mut content = match overrides::for_domain(domain) {
            Some(publisher) => Some(self.override_content(session, publisher).await?),
            None => None,
        };

        let date = Utc::now().timestamp_millis();

        session.execute(self.readability.injection()).await?;
        let mut title = resolve_title(session).await;

        let parsed = session.execute(READABILITY_PARSE_SCRIPT).await?;
        let parsed: Option<ReadabilityArticle> = serde_json::from_value(parsed)
            .map_err(|e| SkipReason::Script(format!("unexpected readability result: {e}")))?;

        if let Some(article) = parsed {
            if content.is_none() {
                content = non_empty(article.text_content);
            }
            if title.is_none() {
                title = non_empty(article.title);
            }
        }

        let Some(content) = content else {
            return Err(SkipReason::NoContent);
        };

        session
            .wait_for_page_load(self.page_load_poll, self.page_load_max_wait)
            .await?;
        sleep(self.settle_delay).await;
        let outbound_requests = outbound::collect(session).await?;

        info!(
            bytes = content.len(),
            hosts = outbound_requests.len(),
            has_title = title.is_some(),
            "Extracted article"
        );
        debug!(preview = %truncate_for_log(&content, 160), "Article body");
        Ok(ExtractionResult {
            date: Some(date),
            title,
            content: Some(content),
            outbound_requests,
        })
    }

    async fn override_content<S: BrowserSession>(
        &self,
        session: &S,
        publisher: &PublisherOverride,
    ) -> Result<String, SkipReason> {
        session
            .wait_for_page_load(self.page_load_poll, self.page_load_max_wait)
            .await?;
        let text = session
            .property(publisher.content_selector, "textContent")
            .await?;
        debug!(publisher = publisher.name, found = text.is_some(), "Applied publisher override");
        non_empty(text).ok_or(SkipReason::EmptyOverrideContent(publisher.name))
    }
}

/// `og:title`, falling back to the document `<title>`. Lookup failures count as absent.
async fn resolve_title<S: BrowserSession>(session: &S) -> Option<String> {
    if let Ok(og) = session.attribute(OG_TITLE_SELECTOR, "content").await {
        if let Some(title) = non_empty(og) {
            return Some(title);
        }
    }
    session
        .property(TITLE_SELECTOR, "textContent")
        .await
        .ok()
        .and_then(non_empty)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
