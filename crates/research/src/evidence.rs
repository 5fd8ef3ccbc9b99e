use serde::{Deserialize, Serialize};

use crate::search::SearchHit;

/// One search result kept as evidence for a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl From<SearchHit> for EvidenceItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            title: hit.title,
            snippet: hit.snippet,
            url: hit.url,
        }
    }
}

/// Everything found for a single claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub queries: Vec<String>,
    pub items: Vec<EvidenceItem>,
    /// First search failure for this claim. Items found by the other queries
    /// are still kept.
    pub search_error: Option<String>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn urls(&self) -> Vec<String> {
        self.items.iter().map(|item| item.url.clone()).collect()
    }

    /// Add an item unless its URL is already present or the cap is reached.
    /// Returns whether it was kept.
    pub fn push_unique(&mut self, item: EvidenceItem, cap: usize) -> bool {
        if self.items.len() >= cap || self.items.iter().any(|existing| same_url(&existing.url, &item.url)) {
            return false;
        }
        self.items.push(item);
        true
    }
}

fn same_url(a: &str, b: &str) -> bool {
    a.trim_end_matches('/').eq_ignore_ascii_case(b.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> EvidenceItem {
        EvidenceItem {
            title: "title".to_string(),
            snippet: "snippet".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_push_unique_dedupes_and_caps() {
        let mut evidence = Evidence::default();

        assert!(evidence.push_unique(item("https://a.org/x"), 2));
        assert!(!evidence.push_unique(item("https://a.org/x/"), 2));
        assert!(evidence.push_unique(item("https://b.org/y"), 2));
        assert!(!evidence.push_unique(item("https://c.org/z"), 2));

        assert_eq!(evidence.urls(), vec!["https://a.org/x", "https://b.org/y"]);
    }
}
