use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where a piece of content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum Origin {
    Url(String),
    Text,
}

impl Origin {
    pub fn label(&self) -> &str {
        match self {
            Origin::Url(url) => url,
            Origin::Text => "text",
        }
    }
}

/// Raw text handed to the claim pipeline, either scraped from a URL or pasted in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceContent {
    pub id: String,
    pub origin: Origin,
    pub body: String,
    pub title: Option<String>,
    pub byline: Option<String>,
    pub published: Option<DateTime<Utc>>,
    /// Name of the page source that produced the body (URL origin only)
    pub fetched_by: Option<String>,
}

impl SourceContent {
    pub fn from_text(text: &str) -> Self {
        Self {
            id: Self::generate_content_id(&Origin::Text, text),
            origin: Origin::Text,
            body: text.to_string(),
            title: None,
            byline: None,
            published: None,
            fetched_by: None,
        }
    }

    pub fn from_page(url: &str, page: Page, fetched_by: &str) -> Self {
        let origin = Origin::Url(url.to_string());
        Self {
            id: Self::generate_content_id(&origin, &page.body),
            origin,
            body: page.body,
            title: page.title,
            byline: page.byline,
            published: page.published,
            fetched_by: Some(fetched_by.to_string()),
        }
    }

    fn generate_content_id(origin: &Origin, body: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(origin.label().as_bytes());
        hasher.update(body.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16]) // Use first 16 bytes (32 hex chars)
    }

    pub fn url(&self) -> Option<&str> {
        match &self.origin {
            Origin::Url(url) => Some(url),
            Origin::Text => None,
        }
    }

    pub fn host(&self) -> Option<String> {
        self.url()
            .and_then(|u| url::Url::parse(u).ok())
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    }

    /// Estimate token count (rough: 1.3 tokens per word)
    pub fn estimated_tokens(&self) -> usize {
        let word_count = self.body.split_whitespace().count();
        (word_count as f64 * 1.3) as usize
    }
}

/// What a page source hands back before it is wrapped into `SourceContent`.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub body: String,
    pub title: Option<String>,
    pub byline: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Page {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }
}
