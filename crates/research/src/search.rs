use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

const DUCKDUCKGO_HTML: &str = "https://html.duckduckgo.com/html/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search provider returned status {0}")]
    Status(u16),

    #[error("search provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Keyless web search through DuckDuckGo's HTML results page.
pub struct DuckDuckGoSearch {
    endpoint: String,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_endpoint(DUCKDUCKGO_HTML.to_string(), client)
    }

    pub fn with_endpoint(endpoint: String, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        tracing::debug!(query, "Searching");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0 (compatible; factcheck/0.1)")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let html = response.text().await?;
        Ok(parse_results(&html, limit))
    }
}

/// Read organic results out of a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result:not(.result--ad)"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&result_sel)
        .filter_map(|item| {
            let anchor = item.select(&link_sel).next()?;
            let url = resolve_link(anchor.value().attr("href")?)?;
            let title = collapse(anchor.text());
            let snippet = item.select(&snippet_sel).next().map(|s| collapse(s.text())).unwrap_or_default();
            Some(SearchHit { title, snippet, url })
        })
        .take(limit)
        .collect()
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result links go through a `/l/?uddg=<target>` redirect; unwrap it.
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    if parsed.path().starts_with("/l/") {
        let target = parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;
        return web_link(Url::parse(&target).ok()?);
    }

    web_link(parsed)
}

/// Only http(s) links are kept as evidence.
fn web_link(url: Url) -> Option<String> {
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
