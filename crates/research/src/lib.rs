pub mod evidence;
pub mod mock;
pub mod query;
pub mod search;

pub use evidence::{Evidence, EvidenceItem};
pub use query::plan_queries;
pub use search::{DuckDuckGoSearch, SearchError, SearchHit, SearchProvider};

use std::sync::Arc;

use extract::Claim;

#[derive(Debug, Clone)]
pub struct ResearchConfig {
    pub max_results_per_claim: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_results_per_claim: 5,
        }
    }
}

/// Third pipeline step: look for evidence about each claim on the web.
pub struct Researcher {
    provider: Arc<dyn SearchProvider>,
    config: ResearchConfig,
}

impl Researcher {
    pub fn new(provider: Arc<dyn SearchProvider>, config: ResearchConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Gather evidence for one claim. Never fails: a search error is recorded
    /// in `search_error` and the claim can still be given a verdict.
    pub async fn gather(&self, claim: &Claim) -> Evidence {
        let cap = self.config.max_results_per_claim;
        let mut evidence = Evidence {
            queries: plan_queries(&claim.text),
            ..Default::default()
        };

        for query in evidence.queries.clone() {
            if evidence.items.len() >= cap {
                break;
            }

            match self.provider.search(&query, cap).await {
                Ok(hits) => {
                    for hit in hits {
                        evidence.push_unique(hit.into(), cap);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        query = %query,
                        error = %e,
                        "Search failed, continuing without its results"
                    );
                    evidence.search_error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        tracing::debug!(
            claim = %claim.text,
            queries = evidence.queries.len(),
            items = evidence.items.len(),
            "Evidence gathered"
        );

        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingSearch, StaticSearch};

    fn researcher(provider: impl SearchProvider + 'static, max: usize) -> Researcher {
        Researcher::new(
            Arc::new(provider),
            ResearchConfig {
                max_results_per_claim: max,
            },
        )
    }

    #[tokio::test]
    async fn test_gather_caps_and_dedupes() {
        let search = StaticSearch::from_triples(&[
            ("NASA", "Earth orbits the Sun.", "https://science.nasa.gov/earth/"),
            ("NASA again", "Same page.", "https://science.nasa.gov/earth"),
            ("Wikipedia", "Earth's orbit.", "https://en.wikipedia.org/wiki/Earth%27s_orbit"),
            ("ESA", "Planets.", "https://www.esa.int/planets"),
        ]);

        let evidence = researcher(search, 2).gather(&Claim::new("The Earth orbits the Sun.")).await;

        assert_eq!(evidence.queries, vec!["The Earth orbits the Sun."]);
        assert_eq!(
            evidence.urls(),
            vec!["https://science.nasa.gov/earth/", "https://en.wikipedia.org/wiki/Earth%27s_orbit"]
        );
        assert!(evidence.search_error.is_none());
    }

    #[tokio::test]
    async fn test_verification_queries_are_merged() {
        let search = StaticSearch::from_triples(&[("Report", "Figures confirmed.", "https://news.example.org/a")]);

        let evidence = researcher(search, 5)
            .gather(&Claim::new("Officials could not verify the figures"))
            .await;

        assert_eq!(evidence.queries.len(), 2);
        assert_eq!(evidence.items.len(), 1);
    }

    /// Answers plain queries and fails the verification follow-up.
    struct FollowUpFails;

    #[async_trait::async_trait]
    impl SearchProvider for FollowUpFails {
        fn name(&self) -> &'static str {
            "follow-up-fails"
        }

        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
            if query.contains("confirmed OR verified") {
                return Err(SearchError::Provider("rate limited".to_string()));
            }
            Ok(vec![SearchHit {
                title: "Report".to_string(),
                snippet: "Figures disputed.".to_string(),
                url: "https://news.example.org/a".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn test_partial_search_failure_keeps_found_items() {
        let evidence = researcher(FollowUpFails, 5)
            .gather(&Claim::new("Officials could not verify the figures"))
            .await;

        assert_eq!(evidence.queries.len(), 2);
        assert_eq!(evidence.urls(), vec!["https://news.example.org/a"]);
        assert!(evidence.search_error.as_deref().unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_empty_evidence() {
        let researcher = researcher(FailingSearch, 5);

        for claim in [Claim::new("The Earth orbits the Sun."), Claim::new("Water is wet.")] {
            let evidence = researcher.gather(&claim).await;
            assert!(evidence.is_empty());
            assert!(evidence.search_error.as_deref().unwrap().contains("unavailable"));
        }
    }

    #[tokio::test]
    async fn test_no_results_is_not_an_error() {
        let evidence = researcher(StaticSearch::empty(), 5).gather(&Claim::new("Mars has two moons.")).await;

        assert!(evidence.is_empty());
        assert!(evidence.search_error.is_none());
    }
}
