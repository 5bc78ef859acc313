//! JSON dumps of a run.
//!
//! Both outputs are flat, pretty-printed JSON objects written once at the end
//! of a pass:
//!
//! ```text
//! discover → { "<domain>": ["<url>", ...] }
//! extract  → { "<domain>": { "<url>": { "date", "title", "content", "outBoundRequests" } } }
//! ```

use crate::models::{HomepageLinkSet, ResultMap};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `value` with a four-space indent.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
async fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = to_pretty_json(value)?;
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await?;
    }
    fs::write(path, &json).await?;
    info!(bytes = json.len(), "Wrote JSON");
    Ok(())
}

/// Write the homepage link set produced by a discovery pass.
pub async fn write_link_set(links: &HomepageLinkSet, path: &Path) -> Result<(), Box<dyn Error>> {
    write_json(links, path).await
}

/// Write the nested extraction results.
pub async fn write_results(results: &ResultMap, path: &Path) -> Result<(), Box<dyn Error>> {
    write_json(results, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionResult;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn test_four_space_indent() {
        let mut links = HomepageLinkSet::new();
        links.insert("x.com".to_string(), vec!["https://x.com/a".to_string()]);
        let json = String::from_utf8(to_pretty_json(&links).unwrap()).unwrap();
        assert_eq!(json, "{\n    \"x.com\": [\n        \"https://x.com/a\"\n    ]\n}");
    }

    #[test]
    fn test_dump_keys_are_sorted() {
        let mut links = HomepageLinkSet::new();
        links.insert(
            "z.com".to_string(),
            vec!["https://z.com/b".to_string(), "https://z.com/a".to_string()],
        );
        links.insert("a.com".to_string(), vec![]);
        let json = String::from_utf8(to_pretty_json(&links).unwrap()).unwrap();
        assert!(json.find("\"a.com\"").unwrap() < json.find("\"z.com\"").unwrap());
        // URL lists keep discovery order
        assert!(json.find("https://z.com/b").unwrap() < json.find("https://z.com/a").unwrap());
    }

    #[tokio::test]
    async fn test_write_results_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("dom-trees-by-domain.json");

        let mut articles = BTreeMap::new();
        articles.insert(
            "https://x.com/a".to_string(),
            ExtractionResult {
                date: Some(42),
                title: Some("A".to_string()),
                content: Some("body".to_string()),
                outbound_requests: BTreeSet::from(["x.com".to_string()]),
            },
        );
        let mut results = ResultMap::new();
        results.insert("x.com".to_string(), articles);

        write_results(&results, &path).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let back: ResultMap = serde_json::from_str(&written).unwrap();
        assert_eq!(back, results);
        assert!(written.contains("\"outBoundRequests\""));
    }
}
