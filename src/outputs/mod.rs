//! Output generation.
//!
//! - [`json`]: pretty-printed JSON dumps of link sets and extraction results
//!
//! # Output Files
//!
//! ```text
//! news-articles-dump.json      # discover: domain → article URLs
//! dom-trees-by-domain.json     # extract / crawl: domain → URL → result
//! ```

pub mod json;
