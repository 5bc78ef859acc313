//! Homepage teaser locator.
//!
//! Editorial homepages wrap their article previews in wildly different markup,
//! so instead of per-site selectors this module works bottom-up:
//!
//! 1. **Leaves**: every element without element children whose trimmed text is
//!    longer than [`LEAF_MIN_CHARS`] and has more than [`LEAF_MIN_TOKENS`] tokens.
//! 2. **Ascent**: from each leaf, climb at most [`MAX_ASCENT`] levels looking
//!    for the element that stands for one teaser (see [`ascend`]).
//! 3. **Links**: take the teaser's own `href` (anchors) or its first
//!    descendant anchor's, normalize it, and drop duplicates.

use crate::browser::BrowserSession;
use crate::error::SkipReason;
use crate::utils::{normalize_url, token_count};
use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument};

/// Leaves must carry strictly more characters than this.
pub const LEAF_MIN_CHARS: usize = 12;
/// Leaves must carry strictly more tokens than this.
pub const LEAF_MIN_TOKENS: usize = 3;
/// Bare anchors need strictly more tokens than this to count as a teaser.
pub const ANCHOR_MIN_TOKENS: usize = 4;
/// Number of levels (the leaf included) examined per ascent.
pub const MAX_ASCENT: usize = 10;

const HOMEPAGE_HTML_SCRIPT: &str = "return document.documentElement.innerHTML";

/// Outcome of evaluating the ascent rules on one element.
enum Step<'a> {
    Teaser(ElementRef<'a>),
    Abandon,
    Climb,
}

/// Load `https://{domain}` in the session and return the article URLs its teasers link to.
///
/// The page markup is read once after navigation and every teaser
/// search runs over that snapshot.
///
/// # Arguments
///
/// * `session` - Browser session the homepage is loaded in
/// * `domain` - Bare hostname, also used to resolve domain-relative links
///
/// # Returns
///
/// Normalized URLs in document order with duplicates removed, or a
/// [`SkipReason`] when the homepage cannot be loaded or read.
#[instrument(level = "info", skip(session))]
pub async fn index_articles<S: BrowserSession>(
    session: &S,
    domain: &str,
) -> Result<Vec<String>, SkipReason> {
    let homepage = format!("https://{domain}");
    session.goto(&homepage).await?;

    let html = session.execute(HOMEPAGE_HTML_SCRIPT).await?;
    let Some(html) = html.as_str() else {
        return Err(SkipReason::Script(
            "homepage markup was not a string".to_string(),
        ));
    };

    let document = Html::parse_document(html);
    let urls = teaser_urls(&document, domain);
    info!(count = urls.len(), %domain, "Indexed homepage article URLs");
    debug!(urls = ?urls, "Homepage URLs");
    Ok(urls)
}

/// Article URLs of every teaser in `document`, first-seen order, no duplicates.
pub fn teaser_urls(document: &Html, source_domain: &str) -> Vec<String> {
    locate_teasers(document)
        .into_iter()
        .filter_map(|teaser| normalize_url(teaser_href(teaser), source_domain))
        .unique()
        .collect()
}

/// Teaser elements found by ascending from each qualifying leaf.
///
/// Several leaves may resolve to the same teaser; those repeats are kept here
/// and collapse once the URLs are deduplicated.
pub fn locate_teasers(document: &Html) -> Vec<ElementRef<'_>> {
    let leaves = find_leaves(document);
    let teasers: Vec<_> = leaves.iter().filter_map(|leaf| ascend(*leaf)).collect();
    debug!(leaves = leaves.len(), teasers = teasers.len(), "Located teasers");
    teasers
}

/// Elements with no element children that carry enough text to be teaser copy.
pub fn find_leaves(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| !el.children().any(|c| c.value().is_element()))
        .filter(|el| {
            let text = trimmed_text(*el);
            !text.is_empty()
                && text.chars().count() > LEAF_MIN_CHARS
                && token_count(&text) > LEAF_MIN_TOKENS
        })
        .collect()
}

/// Climb from `leaf` to the element that represents its teaser, if any.
///
/// At each level, first match wins:
/// 1. `nav` abandons the leaf.
/// 2. A heading resolves to its enclosing `article`, else itself if it holds
///    an anchor, else its parent if that is an anchor.
/// 3. An element with a direct heading child is the teaser.
/// 4. An anchor inside an editorial container with more than
///    [`ANCHOR_MIN_TOKENS`] tokens of text is the teaser.
/// 5. An `article` is the teaser.
///
/// Gives up after [`MAX_ASCENT`] levels or at the document root.
pub fn ascend(leaf: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut current = leaf;
    for _ in 0..MAX_ASCENT {
        match evaluate(current) {
            Step::Teaser(teaser) => return Some(teaser),
            Step::Abandon => return None,
            Step::Climb => {}
        }
        current = parent_element(current)?;
    }
    None
}

fn evaluate(el: ElementRef<'_>) -> Step<'_> {
    let tag = el.value().name();
    if tag == "nav" {
        return Step::Abandon;
    }

    if is_heading(el) {
        if let Some(article) = closest(el, "article") {
            return Step::Teaser(article);
        }
        if has_descendant(el, "a") {
            return Step::Teaser(el);
        }
        return match parent_element(el) {
            Some(parent) if parent.value().name() == "a" => Step::Teaser(parent),
            _ => Step::Climb,
        };
    }

    if el.children().filter_map(ElementRef::wrap).any(is_heading) {
        return Step::Teaser(el);
    }

    if tag == "a"
        && in_editorial_container(el)
        && token_count(&trimmed_text(el)) > ANCHOR_MIN_TOKENS
    {
        return Step::Teaser(el);
    }

    if tag == "article" {
        return Step::Teaser(el);
    }

    Step::Climb
}

/// The raw `href` a teaser points at.
fn teaser_href(teaser: ElementRef<'_>) -> Option<&str> {
    if teaser.value().name() == "a" {
        return teaser.value().attr("href");
    }
    teaser
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
}

fn in_editorial_container(el: ElementRef<'_>) -> bool {
    closest(el, "article").is_some()
        || closest(el, "section").is_some()
        || el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| a.value().attr("class").is_some_and(|c| c.contains("story")))
}

fn is_heading(el: ElementRef<'_>) -> bool {
    matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

/// `el` itself or its nearest ancestor with tag `tag`.
fn closest<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find(|e| e.value().name() == tag)
}

fn has_descendant(el: ElementRef<'_>, tag: &str) -> bool {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == tag)
}

fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
