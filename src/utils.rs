//! Utility functions for URL normalization, text measurement and file system checks.
//!
//! - URL normalization for hrefs found on a homepage
//! - Whitespace token counting used by the teaser thresholds
//! - String truncation for logging
//! - Output location validation

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Turn a homepage `href` into an absolute article URL.
///
/// Rules, in order:
/// - `None` stays `None`.
/// - `//host/path` gets an `https:` prefix.
/// - `/path` becomes `https://{source_domain}/` followed by the href verbatim, so the
///   leading slash is doubled (`https://x.com//foo`). Servers collapse it.
/// - Anything else is taken as-is.
///
/// The candidate must then parse as an absolute URL or it is dropped. The
/// constructed string is returned unchanged, not the parser's serialization.
///
/// # Arguments
///
/// * `href` - Raw `href` attribute value, if the anchor had one
/// * `source_domain` - Bare hostname of the homepage the anchor was found on
///
/// # Returns
///
/// `Some(url)` for a usable absolute URL, `None` when `href` is absent or the
/// candidate does not parse with a host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url(Some("/foo"), "x.com").as_deref(), Some("https://x.com//foo"));
/// assert_eq!(normalize_url(Some("not a url"), "x.com"), None);
/// ```
pub fn normalize_url(href: Option<&str>, source_domain: &str) -> Option<String> {
    let href = href?;
    let candidate = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("https://{source_domain}/{href}")
    } else {
        href.to_string()
    };

    if candidate.is_empty() {
        return None;
    }

    match Url::parse(&candidate) {
        Ok(url) if url.has_host() => Some(candidate),
        _ => None,
    }
}

/// Number of whitespace-separated tokens in `text`.
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a byte count
/// appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure the directory that will hold `output_file` exists and is writable.
///
/// Creates the parent directory if needed, then writes and removes a probe
/// file next to where the output will land.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %output_file.display()))]
pub async fn ensure_writable_parent(output_file: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match output_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let probe_path = dir.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!(dir = %dir.display(), "Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_relative_keeps_double_slash() {
        assert_eq!(
            normalize_url(Some("/foo"), "x.com").as_deref(),
            Some("https://x.com//foo")
        );
    }

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(
            normalize_url(Some("//cdn.y.com/a"), "x.com").as_deref(),
            Some("https://cdn.y.com/a")
        );
    }

    #[test]
    fn test_normalize_absolute_unchanged() {
        assert_eq!(
            normalize_url(Some("http://z.com/a"), "x.com").as_deref(),
            Some("http://z.com/a")
        );
    }

    #[test]
    fn test_normalize_drops_invalid() {
        assert_eq!(normalize_url(Some("not a url"), "x.com"), None);
        assert_eq!(normalize_url(Some("relative/path"), "x.com"), None);
        assert_eq!(normalize_url(Some(""), "x.com"), None);
        assert_eq!(normalize_url(Some("mailto:desk@x.com"), "x.com"), None);
        assert_eq!(normalize_url(None, "x.com"), None);
    }

    #[test]
    fn test_token_count() {
        assert_eq!(token_count("  one two\tthree\nfour "), 4);
        assert_eq!(token_count(""), 0);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("ééééé", 2);
        assert!(result.starts_with("éé…"));
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested").join("results.json");
        ensure_writable_parent(&out).await.unwrap();
        assert!(tmp.path().join("nested").is_dir());
        assert!(!tmp.path().join("nested").join("..__probe_write__").exists());
    }
}
