pub mod firecrawl;
pub mod html;
pub mod source;
pub mod validate;

pub use firecrawl::FirecrawlClient;
pub use html::HtmlScraper;
pub use source::{Origin, Page, SourceContent};
pub use validate::validate_url;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use url::Url;

/// Pages with less readable text than this are treated as failed fetches.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Why a single page source could not produce readable content.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("not an HTML document ({0})")]
    NotHtml(String),

    #[error("no readable content: {0}")]
    Unreadable(String),

    #[error("scraping service error: {0}")]
    Service(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL contains a future date ({year})")]
    FutureDate { year: i32 },

    /// Every configured page source failed.
    #[error("could not retrieve readable content from {url}")]
    Fetch {
        url: String,
        primary: Option<String>,
        fallback: String,
    },
}

/// Something that can turn a URL into readable page text.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &Url) -> Result<Page, SourceError>;
}

/// Fetches page content through the scraping service, falling back to a
/// direct fetch-and-parse when the service is missing or fails.
pub struct ContentAcquirer {
    primary: Option<Arc<dyn PageSource>>,
    fallback: Arc<dyn PageSource>,
}

impl ContentAcquirer {
    pub fn new(primary: Option<Arc<dyn PageSource>>, fallback: Arc<dyn PageSource>) -> Self {
        Self { primary, fallback }
    }

    /// Standard wiring: Firecrawl when a key is available, HTML parsing otherwise.
    pub fn from_key(firecrawl_key: Option<String>, base_url: Option<String>, client: reqwest::Client) -> Self {
        let primary = firecrawl_key.filter(|k| !k.trim().is_empty()).map(|key| {
            let scraper = match base_url {
                Some(base) => FirecrawlClient::new(base, key, client.clone()),
                None => FirecrawlClient::with_key(key, client.clone()),
            };
            Arc::new(scraper) as Arc<dyn PageSource>
        });

        if primary.is_none() {
            tracing::warn!("No scraping service key configured, using direct HTML fetches only");
        }

        Self::new(primary, Arc::new(HtmlScraper::new(client)))
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn acquire(&self, raw_url: &str) -> Result<SourceContent, AcquireError> {
        let url = validate_url(raw_url, chrono::Utc::now().year())?;

        let mut primary_error = None;
        if let Some(primary) = &self.primary {
            match primary.fetch(&url).await {
                Ok(page) => {
                    tracing::info!(url = %url, source = primary.name(), chars = page.body.len(), "Content acquired");
                    return Ok(SourceContent::from_page(url.as_str(), page, primary.name()));
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        source = primary.name(),
                        error = %e,
                        "Primary source failed, falling back"
                    );
                    primary_error = Some(e.to_string());
                }
            }
        }

        match self.fallback.fetch(&url).await {
            Ok(page) => {
                tracing::info!(url = %url, source = self.fallback.name(), chars = page.body.len(), "Content acquired");
                Ok(SourceContent::from_page(url.as_str(), page, self.fallback.name()))
            }
            Err(e) => {
                tracing::error!(url = %url, source = self.fallback.name(), error = %e, "Fallback source failed");
                Err(AcquireError::Fetch {
                    url: url.to_string(),
                    primary: primary_error,
                    fallback: e.to_string(),
                })
            }
        }
    }
}
