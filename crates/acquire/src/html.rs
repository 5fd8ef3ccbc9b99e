//! Direct page fetch plus readable-text extraction, used when the scraping
//! service is unavailable.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::source::Page;
use crate::{MIN_CONTENT_CHARS, PageSource, SourceError};

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const BODY_TEXT_LIMIT: usize = 8000;

const BBC_HEADLINES: &[&str] = &[
    "h1",
    "[data-component=\"headline\"]",
    ".article-headline",
    ".story-body__h1",
];

const BBC_CONTAINERS: &str = "article, [data-component=\"text-block\"], .story-body__inner, \
div[data-component=\"text\"], div[class*=\"RichText\"], .article__body-content, .story-body, \
.body-content-container, .article-body-content";

const BBC_METADATA: &str = ".article-info, .author-unit__content, .byline, .article-meta, \
.article__author, .article__timestamp, [data-component=\"byline\"], [data-component=\"meta\"]";

const MAIN_CONTENT: &str = "main, article, .content, #content, .article-content, .post-content";

const SKIP_CLASSES: &[&str] = &["navigation", "social", "share", "hidden"];
const NOISE_PHRASES: &[&str] = &["cookie", "subscribe", "newsletter", "share this", "follow us"];

pub struct HtmlScraper {
    client: reqwest::Client,
}

impl HtmlScraper {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }
}

#[async_trait]
impl PageSource for HtmlScraper {
    fn name(&self) -> &'static str {
        "html"
    }

    async fn fetch(&self, url: &Url) -> Result<Page, SourceError> {
        tracing::debug!(url = %url, "Fetching page directly");

        let response = self
            .client
            .get(url.as_str())
            .headers(Self::browser_headers())
            .send()
            .await?;

        let final_url = response.url().clone();
        if final_url
            .host_str()
            .is_some_and(|h| h == "example.com" || h.ends_with(".example.com"))
        {
            return Err(SourceError::Unreadable(format!(
                "redirected to placeholder site {}",
                final_url
            )));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());
        if let Some(content_type) = content_type {
            if !content_type.contains("html") {
                return Err(SourceError::NotHtml(content_type));
            }
        }

        let html = response.text().await?;
        let page = parse_page(&html, url.host_str());

        let length = page.body.trim().chars().count();
        if length < MIN_CONTENT_CHARS {
            return Err(SourceError::Unreadable(format!(
                "only {} characters of readable text",
                length
            )));
        }

        tracing::debug!(url = %url, chars = length, "Extracted page text");
        Ok(page)
    }
}

/// Pull the readable article text and metadata out of an HTML document.
///
/// Tries a site profile for known news hosts first, then generic article
/// containers, then every long paragraph, and finally the whole body text.
pub fn parse_page(html: &str, host: Option<&str>) -> Page {
    let document = Html::parse_document(html);
    let mut blocks = Vec::new();
    let mut headline = None;

    if host.is_some_and(is_bbc_host) {
        headline = BBC_HEADLINES
            .iter()
            .find_map(|selector| first_text(&document, selector));
        if let Some(h) = &headline {
            blocks.push(format!("# {}", h));
        }

        for container in select(&document, BBC_CONTAINERS) {
            blocks.extend(paragraphs(container, 10));
        }

        for meta in select(&document, BBC_METADATA) {
            let text = element_text(meta);
            if !text.is_empty() && !is_noise(&text) {
                blocks.push(format!("*{}*", text));
            }
        }

        if blocks.is_empty() {
            blocks.extend(
                select(&document, "p")
                    .map(element_text)
                    .filter(|t| t.chars().count() > 40 && !is_noise(t)),
            );
        }
    }

    if blocks.is_empty() {
        blocks = match select(&document, MAIN_CONTENT).next() {
            Some(main) => paragraphs(main, 30),
            None => select(&document, "p")
                .map(element_text)
                .filter(|t| t.chars().count() > 50)
                .collect(),
        };
    }

    if blocks.is_empty() {
        let text = body_text(&document);
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    let mut seen = HashSet::new();
    let body = blocks
        .into_iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty() && seen.insert(b.clone()))
        .collect::<Vec<_>>()
        .join("\n\n");

    Page {
        body,
        title: headline
            .or_else(|| first_text(&document, "title"))
            .or_else(|| meta_content(&document, "meta[property=\"og:title\"]")),
        byline: meta_content(&document, "meta[name=\"author\"]")
            .or_else(|| meta_content(&document, "meta[property=\"article:author\"]")),
        published: meta_content(&document, "meta[property=\"article:published_time\"]")
            .or_else(|| meta_content(&document, "meta[name=\"date\"]"))
            .and_then(|raw| parse_date(&raw)),
    }
}

fn is_bbc_host(host: &str) -> bool {
    let host = host.to_lowercase();
    host == "bbc.com" || host.ends_with(".bbc.com") || host == "bbc.co.uk" || host.ends_with(".bbc.co.uk")
}

fn select<'a>(document: &'a Html, selector: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let parsed = Selector::parse(selector).ok();
    parsed
        .into_iter()
        .flat_map(move |s| document.select(&s).collect::<Vec<_>>())
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    select(document, selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    select(document, selector)
        .find_map(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn paragraphs(container: ElementRef, min_chars: usize) -> Vec<String> {
    let Ok(p) = Selector::parse("p") else {
        return Vec::new();
    };

    container
        .select(&p)
        .filter(|el| {
            let class = el.value().attr("class").unwrap_or("").to_lowercase();
            !SKIP_CLASSES.iter().any(|skip| class.contains(skip))
        })
        .map(element_text)
        .filter(|t| t.chars().count() > min_chars && !t.starts_with("Share this"))
        .collect()
}

fn is_noise(text: &str) -> bool {
    let lower = text.to_lowercase();
    NOISE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

fn body_text(document: &Html) -> String {
    let Some(body) = select(document, "body").next() else {
        return String::new();
    };

    let raw = body
        .descendants()
        .filter(|node| {
            node.parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .is_none_or(|name| name != "script" && name != "style" && name != "noscript")
        })
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect::<Vec<_>>()
        .join(" ");

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let noise = Regex::new(r"(?i)(Share this|Follow us|Subscribe|Cookie|Newsletter).*?(\.|$)")
        .expect("static noise pattern");
    let cleaned = noise.replace_all(&collapsed, "");

    cleaned.graphemes(true).take(BODY_TEXT_LIMIT).collect::<String>().trim().to_string()
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
