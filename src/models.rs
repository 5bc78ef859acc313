//! Data models shared by the discovery and extraction passes.
//!
//! - [`ExtractionResult`]: what one article visit produces
//! - [`HomepageLinkSet`]: domain → article URLs discovered on its homepage
//! - [`ResultMap`]: domain → article URL → [`ExtractionResult`]
//!
//! The JSON field names of [`ExtractionResult`] match the flat dumps consumed
//! downstream, hence the `outBoundRequests` rename.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A bare hostname such as `example.com`.
pub type Domain = String;

/// An absolute URL that parsed successfully.
pub type ArticleUrl = String;

/// Domain → article URLs in discovery order, duplicates removed.
///
/// Domains are keyed in sorted order so dumps are identical whatever order
/// parallel domains finish in.
pub type HomepageLinkSet = BTreeMap<Domain, Vec<ArticleUrl>>;

/// Domain → article URL → extraction result. Written once at the end of a run.
///
/// Both levels are sorted by key, not by visit order.
pub type ResultMap = BTreeMap<Domain, BTreeMap<ArticleUrl, ExtractionResult>>;

/// Structured content pulled from one article page.
///
/// Only complete results are ever built; a visit that fails half-way yields a
/// [`SkipReason`](crate::error::SkipReason) instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionResult {
    /// Capture time in milliseconds since the Unix epoch (not the publish time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    /// Headline from `og:title`, `<title>` or readability, in that order.
    pub title: Option<String>,
    /// Article body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Hostnames contacted while the page loaded.
    #[serde(rename = "outBoundRequests", default)]
    pub outbound_requests: BTreeSet<String>,
}

/// Counters logged at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub domains: usize,
    pub domains_skipped: usize,
    pub articles_attempted: usize,
    pub articles_extracted: usize,
}

impl RunSummary {
    pub fn articles_skipped(&self) -> usize {
        self.articles_attempted - self.articles_extracted
    }

    pub fn absorb(&mut self, other: RunSummary) {
        self.domains += other.domains;
        self.domains_skipped += other.domains_skipped;
        self.articles_attempted += other.articles_attempted;
        self.articles_extracted += other.articles_extracted;
    }
}
