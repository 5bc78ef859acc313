//! [`BrowserSession`] over a WebDriver server via `thirtyfour`.
//!
//! Point `webdriver_url` at geckodriver, chromedriver or a Selenium hub. Each
//! session launches its own browser window.

use super::{BrowserSession, SessionFactory};
use crate::config::{BrowserKind, RunConfig};
use crate::error::SkipReason;
use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{error, info, instrument};

#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    server_url: String,
    browser: BrowserKind,
    headless: bool,
}

impl WebDriverFactory {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            server_url: config.webdriver_url.clone(),
            browser: config.browser,
            headless: config.headless,
        }
    }

    async fn connect(&self) -> WebDriverResult<WebDriver> {
        match self.browser {
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if self.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(self.server_url.as_str(), caps).await
            }
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if self.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(self.server_url.as_str(), caps).await
            }
        }
    }
}

impl SessionFactory for WebDriverFactory {
    type Session = WebDriverSession;

    #[instrument(level = "info", skip(self), fields(server = %self.server_url, browser = ?self.browser))]
    async fn open(&self) -> Result<Self::Session, SkipReason> {
        match self.connect().await {
            Ok(driver) => {
                info!("Browser session opened");
                Ok(WebDriverSession { driver })
            }
            Err(e) => {
                error!(error = %e, "Failed to open browser session");
                Err(SkipReason::SessionSetup(e.to_string()))
            }
        }
    }
}

pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    async fn find(&self, selector: &str) -> Result<WebElement, SkipReason> {
        self.driver
            .find(By::Css(selector))
            .await
            .map_err(|e| lookup_error(selector, e))
    }
}

/// Only a failed match counts as a missing element; session and transport
/// errors keep their own message.
fn lookup_error(selector: &str, e: WebDriverError) -> SkipReason {
    match e {
        WebDriverError::NoSuchElement(_) => SkipReason::ElementMissing(selector.to_string()),
        other => other.into(),
    }
}

impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), SkipReason> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| SkipReason::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn execute(&self, script: &str) -> Result<Value, SkipReason> {
        let ret = self.driver.execute(script, Vec::new()).await?;
        Ok(ret.json().clone())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, SkipReason> {
        let element = self.find(selector).await?;
        Ok(element.attr(name).await?)
    }

    async fn property(&self, selector: &str, name: &str) -> Result<Option<String>, SkipReason> {
        let element = self.find(selector).await?;
        Ok(element.prop(name).await?)
    }

    async fn quit(self) -> Result<(), SkipReason> {
        self.driver.quit().await?;
        Ok(())
    }
}
