use async_trait::async_trait;

use crate::search::{SearchError, SearchHit, SearchProvider};

/// Returns the same hits for every query.
pub struct StaticSearch {
    hits: Vec<SearchHit>,
}

impl StaticSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self { hits }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Shorthand for hits given as `(title, snippet, url)`.
    pub fn from_triples(hits: &[(&str, &str, &str)]) -> Self {
        Self::new(
            hits.iter()
                .map(|(title, snippet, url)| SearchHit {
                    title: title.to_string(),
                    snippet: snippet.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Fails every query, as an unreachable provider would.
pub struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::Provider("search backend unavailable".to_string()))
    }
}
