//! Narrow interface onto a live browser.
//!
//! The scrapers never talk to WebDriver directly. They drive a
//! [`BrowserSession`], which keeps them testable against an in-memory page and
//! keeps the driver's failure modes (navigation error, script error,
//! element-not-found) expressed as [`SkipReason`]s.
//!
//! Sessions are opened through a [`SessionFactory`]. A failed open is an
//! explicit `Err`, so there is never a half-built session to call into.

pub mod webdriver;

use crate::error::SkipReason;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

pub use webdriver::WebDriverFactory;

pub const PAGE_READY_SCRIPT: &str = "return document.readyState === 'complete';";

/// One browser window, navigated and scripted sequentially.
pub trait BrowserSession {
    /// Navigate to `url` and wait for the driver's default load strategy.
    async fn goto(&self, url: &str) -> Result<(), SkipReason>;

    /// Run `script` in the page and return its JSON-converted result.
    async fn execute(&self, script: &str) -> Result<Value, SkipReason>;

    /// Attribute `name` of the first element matching `selector`.
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, SkipReason>;

    /// DOM property `name` (e.g. `textContent`) of the first element matching `selector`.
    async fn property(&self, selector: &str, name: &str) -> Result<Option<String>, SkipReason>;

    /// End the session and close the browser.
    async fn quit(self) -> Result<(), SkipReason>;

    /// Poll until `document.readyState` is `complete`.
    async fn wait_for_page_load(&self, poll: Duration, max_wait: Duration) -> Result<(), SkipReason> {
        let started = Instant::now();
        loop {
            if self.execute(PAGE_READY_SCRIPT).await?.as_bool() == Some(true) {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Page load complete");
                return Ok(());
            }
            if started.elapsed() >= max_wait {
                return Err(SkipReason::PageLoadTimeout(max_wait.as_millis() as u64));
            }
            sleep(poll).await;
        }
    }
}

/// Opens one [`BrowserSession`] per domain.
pub trait SessionFactory {
    type Session: BrowserSession;

    async fn open(&self) -> Result<Self::Session, SkipReason>;
}
