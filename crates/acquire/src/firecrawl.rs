use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::source::Page;
use crate::{MIN_CONTENT_CHARS, PageSource, SourceError};

const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";
const PLACEHOLDER_TEXT: &str = "Example Domain";

/// Client for a Firecrawl-compatible scraping service.
#[derive(Clone)]
pub struct FirecrawlClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 2],
    wait_for: u64,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    html: Option<String>,
    #[serde(default)]
    metadata: ScrapeMetadata,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ScrapeMetadata {
    title: Option<String>,
    author: Option<String>,
    published_time: Option<String>,
}

impl FirecrawlClient {
    pub fn new(base_url: String, api_key: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            client,
        }
    }

    pub fn with_key(api_key: String, client: reqwest::Client) -> Self {
        Self::new(DEFAULT_BASE_URL.to_string(), api_key, client)
    }

    fn into_page(response: ScrapeResponse) -> Result<Page, SourceError> {
        if !response.success {
            return Err(SourceError::Service(
                response.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let data = response
            .data
            .ok_or_else(|| SourceError::Service("response carried no data".to_string()))?;

        let body = data
            .markdown
            .filter(|m| !m.trim().is_empty())
            .or(data.html)
            .unwrap_or_default();

        if body.trim().chars().count() <= MIN_CONTENT_CHARS || body.contains(PLACEHOLDER_TEXT) {
            return Err(SourceError::Unreadable(
                "content is empty, too short, or placeholder text".to_string(),
            ));
        }

        let published = data
            .metadata
            .published_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Page {
            body,
            title: data.metadata.title,
            byline: data.metadata.author,
            published,
        })
    }
}

#[async_trait]
impl PageSource for FirecrawlClient {
    fn name(&self) -> &'static str {
        "firecrawl"
    }

    async fn fetch(&self, url: &Url) -> Result<Page, SourceError> {
        let endpoint = format!("{}/v1/scrape", self.base_url);
        let request = ScrapeRequest {
            url: url.as_str(),
            formats: ["markdown", "html"],
            wait_for: 10_000,
        };

        tracing::debug!(url = %url, "Requesting scrape");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body: ScrapeResponse = response.json().await?;
        Self::into_page(body)
    }
}
