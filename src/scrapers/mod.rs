//! Homepage discovery and article extraction.
//!
//! Both passes follow the same shape: drive a [`BrowserSession`] to a page,
//! pull what is needed out of it, and report failure as a
//! [`SkipReason`](crate::error::SkipReason) rather than an error.
//!
//! | Module | Role |
//! |--------|------|
//! | [`homepage`] | Finds teaser elements on a homepage and turns them into article URLs |
//! | [`article`] | Extracts title, body and outbound hosts from one article page |
//! | [`overrides`] | Publisher-specific body selectors consulted by [`article`] |
//! | [`outbound`] | Hostnames from the page's resource-timing entries |
//!
//! [`BrowserSession`]: crate::browser::BrowserSession

pub mod article;
pub mod homepage;
pub mod outbound;
pub mod overrides;
