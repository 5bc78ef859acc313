//! Readers for the two persisted inputs: a plain domain list and a link set.

use crate::models::HomepageLinkSet;
use itertools::Itertools;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Parse a newline-delimited domain list. Blank lines and `#` comments are ignored.
pub fn parse_domains(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .unique()
        .collect()
}

/// Parse a persisted `{ domain: [url, ...] }` link set, deduplicating each list in order.
pub fn parse_link_set(json: &str) -> Result<HomepageLinkSet, serde_json::Error> {
    let raw: HomepageLinkSet = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(domain, urls)| (domain, urls.into_iter().unique().collect()))
        .collect())
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_domains(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let text = fs::read_to_string(path).await?;
    let domains = parse_domains(&text);
    info!(count = domains.len(), "Loaded domain list");
    Ok(domains)
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_link_set(path: &Path) -> Result<HomepageLinkSet, Box<dyn Error>> {
    let json = fs::read_to_string(path).await?;
    let links = parse_link_set(&json)?;
    info!(
        domains = links.len(),
        urls = links.values().map(Vec::len).sum::<usize>(),
        "Loaded link set"
    );
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domains() {
        let text = "example.com\n\n  news.example.org  \r\n# paused\nexample.com\n";
        assert_eq!(parse_domains(text), vec!["example.com", "news.example.org"]);
    }

    #[test]
    fn test_parse_link_set_dedups_in_order() {
        let json = r#"{
            "x.com": ["https://x.com/b", "https://x.com/a", "https://x.com/b"],
            "y.com": []
        }"#;
        let links = parse_link_set(json).unwrap();
        assert_eq!(links["x.com"], vec!["https://x.com/b", "https://x.com/a"]);
        assert!(links["y.com"].is_empty());
    }

    #[test]
    fn test_parse_link_set_rejects_wrong_shape() {
        assert!(parse_link_set(r#"["x.com"]"#).is_err());
    }

    #[tokio::test]
    async fn test_read_domains_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news-domains.txt");
        tokio::fs::write(&path, "a.com\nb.com\n").await.unwrap();
        assert_eq!(read_domains(&path).await.unwrap(), vec!["a.com", "b.com"]);
    }
}
