//! Publisher-specific body extraction.
//!
//! Some publishers render their article body in a container readability
//! handles poorly. For those domains the body is read straight from a known
//! selector instead, and readability only supplies the title fallback.
//!
//! # Registered publishers
//!
//! | Name | Domain match | Content selector |
//! |------|--------------|------------------|
//! | nytimes | `nytimes.com` | `section[name="articleBody"]` |

/// A body-selector rule for one publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublisherOverride {
    pub name: &'static str,
    /// Matched as a substring of the domain.
    pub domain_fragment: &'static str,
    pub content_selector: &'static str,
}

impl PublisherOverride {
    pub fn matches(&self, domain: &str) -> bool {
        domain.contains(self.domain_fragment)
    }
}

pub static PUBLISHER_OVERRIDES: &[PublisherOverride] = &[PublisherOverride {
    name: "nytimes",
    domain_fragment: "nytimes.com",
    content_selector: r#"section[name="articleBody"]"#,
}];

/// The first registered override whose domain fragment matches `domain`.
pub fn for_domain(domain: &str) -> Option<&'static PublisherOverride> {
    PUBLISHER_OVERRIDES.iter().find(|o| o.matches(domain))
}
