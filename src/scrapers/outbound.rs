//! Outbound request collector.
//!
//! Reads the page's resource-timing entries and reduces them to the set of
//! hostnames the page fetched sub-resources from.

use crate::browser::BrowserSession;
use crate::error::SkipReason;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument};
use url::Url;

const RESOURCE_ENTRIES_SCRIPT: &str = r#"
var performance = window.performance || window.mozPerformance || window.msPerformance || window.webkitPerformance || {};
var entries = (performance.getEntries && performance.getEntries()) || [];
return entries.map(function (e) { return { name: e.name, entryType: e.entryType }; });
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimingEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    entry_type: String,
}

/// Hostnames of every `resource` timing entry on the current page.
#[instrument(level = "debug", skip_all)]
pub async fn collect<S: BrowserSession>(session: &S) -> Result<BTreeSet<String>, SkipReason> {
    let raw = session.execute(RESOURCE_ENTRIES_SCRIPT).await?;
    let entries: Vec<TimingEntry> = if raw.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(raw)
            .map_err(|e| SkipReason::Script(format!("unreadable resource entries: {e}")))?
    };
    let hosts = resource_hosts(&entries);
    debug!(entries = entries.len(), hosts = hosts.len(), "Collected outbound hosts");
    Ok(hosts)
}

fn resource_hosts(entries: &[TimingEntry]) -> BTreeSet<String> {
    entries
        .iter()
        .filter(|e| e.entry_type == "resource")
        .filter_map(|e| Url::parse(&e.name).ok())
        .filter_map(|url| url.host_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakePage, FakeSession};
    use serde_json::json;
    use std::collections::HashMap;

    async fn collect_from(entries: serde_json::Value) -> Result<BTreeSet<String>, SkipReason> {
        let mut pages = HashMap::new();
        pages.insert(
            "https://x.com/a".to_string(),
            FakePage {
                resource_entries: entries,
                ..Default::default()
            },
        );
        let session = FakeSession::new(pages, "");
        session.goto("https://x.com/a").await.unwrap();
        collect(&session).await
    }

    #[tokio::test]
    async fn test_hosts_are_deduplicated() {
        let hosts = collect_from(json!([
            { "name": "https://a.com/app.js", "entryType": "resource" },
            { "name": "https://b.com/pixel.gif", "entryType": "resource" },
            { "name": "https://a.com/style.css", "entryType": "resource" }
        ]))
        .await
        .unwrap();
        assert_eq!(hosts.into_iter().collect::<Vec<_>>(), vec!["a.com", "b.com"]);
    }

    #[tokio::test]
    async fn test_non_resource_and_unparseable_entries_dropped() {
        let hosts = collect_from(json!([
            { "name": "https://x.com/a", "entryType": "navigation" },
            { "name": "first-contentful-paint", "entryType": "paint" },
            { "name": "not a url", "entryType": "resource" },
            { "name": "https://tracker.net/t.js", "entryType": "resource" }
        ]))
        .await
        .unwrap();
        assert_eq!(hosts.into_iter().collect::<Vec<_>>(), vec!["tracker.net"]);
    }

    #[tokio::test]
    async fn test_no_entries() {
        assert!(collect_from(serde_json::Value::Null).await.unwrap().is_empty());
        assert!(collect_from(json!([])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_entries_are_a_script_error() {
        let err = collect_from(json!({ "unexpected": true })).await.unwrap_err();
        assert!(matches!(err, SkipReason::Script(_)));
    }
}
