//! HTTP fetcher implementation
//!
//! This module defines the fetch boundary used by the strategy chain:
//! a [`Fetcher`] trait taking a URL and a CSS selector, and the
//! reqwest-backed [`HttpFetcher`] that evaluates the selector against the
//! fetched document and renders the matched region as text lines.

use crate::config::{CacheMode, CrawlConfig};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Errors at the fetch boundary
///
/// All of these are recoverable from the chain's point of view: a failed
/// fetch moves on to the next strategy, and a failed attempt is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got '{content_type}'")]
    ContentMismatch { url: String, content_type: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Raw extraction output for one (URL, selector) pair
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Text rendering of the matched elements, one line per block
    pub content: String,

    /// Outer HTML of the matched elements
    pub html: String,
}

/// Options applied while rendering fetched documents
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub excluded_tags: Vec<String>,
    pub word_count_threshold: usize,
    pub cache_mode: CacheMode,
}

impl From<&CrawlConfig> for FetchOptions {
    fn from(config: &CrawlConfig) -> Self {
        Self {
            excluded_tags: config.excluded_tags.clone(),
            word_count_threshold: config.word_count_threshold,
            cache_mode: config.cache_mode,
        }
    }
}

/// The page-fetching boundary consumed by the strategy chain
///
/// Implementations are shared read-only across all concurrent tasks.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and extracts the region matched by `selector`
    ///
    /// A selector that matches nothing is a successful fetch with empty
    /// content; whether that is acceptable is the caller's validation
    /// decision, not a fetch error.
    async fn fetch(
        &self,
        url: &str,
        selector: &str,
        options: &FetchOptions,
    ) -> Result<FetchOutcome, FetchError>;
}

/// Builds an HTTP client with proper configuration
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest + scraper backed fetcher
///
/// Holds one shared HTTP client and, when the cache mode allows it, a
/// per-run body cache so fallback strategies against the same URL do not
/// refetch the page.
pub struct HttpFetcher {
    client: Client,
    body_cache: Mutex<HashMap<String, String>>,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            body_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetches the page body, consulting the per-run cache first
    async fn body(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        if options.cache_mode == CacheMode::Enabled {
            if let Ok(cache) = self.body_cache.lock() {
                if let Some(body) = cache.get(url) {
                    tracing::trace!(url, "body cache hit");
                    return Ok(body.clone());
                }
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        if options.cache_mode == CacheMode::Enabled {
            if let Ok(mut cache) = self.body_cache.lock() {
                cache.insert(url.to_string(), body.clone());
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        selector: &str,
        options: &FetchOptions,
    ) -> Result<FetchOutcome, FetchError> {
        let body = self.body(url, options).await?;
        extract_region(&body, selector, options)
    }
}

fn classify_reqwest_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Evaluates a CSS selector against an HTML document and renders the
/// matched elements as text lines plus their outer HTML
pub fn extract_region(
    body: &str,
    selector: &str,
    options: &FetchOptions,
) -> Result<FetchOutcome, FetchError> {
    let parsed = Selector::parse(selector).map_err(|e| FetchError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(body);
    let mut lines = Vec::new();
    let mut html = String::new();

    for element in document.select(&parsed) {
        collect_lines(element, &options.excluded_tags, &mut lines);
        if !html.is_empty() {
            html.push('\n');
        }
        html.push_str(&element.html());
    }

    // Noise filter: short non-heading lines are dropped
    let threshold = options.word_count_threshold;
    lines.retain(|line| {
        line.starts_with('#') || line.split_whitespace().count() >= threshold
    });

    Ok(FetchOutcome {
        content: lines.join("\n"),
        html,
    })
}

fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

const INLINE_TAGS: &[&str] = &[
    "a", "b", "i", "em", "strong", "span", "code", "small", "sub", "sup", "u", "mark",
];

fn is_excluded(name: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Walks an element's children, producing one line per block element and
/// markdown-style heading lines for h1..h6
fn collect_lines(element: ElementRef<'_>, excluded: &[String], out: &mut Vec<String>) {
    let mut line = String::new();

    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_inline(&mut line, text),
            Node::Element(el) => {
                let name = el.name();
                if is_excluded(name, excluded) {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if let Some(level) = heading_level(name) {
                    flush_line(&mut line, out);
                    let text = inline_text(child_ref, excluded);
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push(format!("{} {}", "#".repeat(level), text));
                    }
                } else if INLINE_TAGS.contains(&name) {
                    push_inline(&mut line, &inline_text(child_ref, excluded));
                } else {
                    flush_line(&mut line, out);
                    collect_lines(child_ref, excluded, out);
                }
            }
            _ => {}
        }
    }

    flush_line(&mut line, out);
}

/// Concatenates the text of an inline element, skipping excluded subtrees
fn inline_text(element: ElementRef<'_>, excluded: &[String]) -> String {
    let mut text = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) => {
                if is_excluded(el.name(), excluded) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    text.push_str(&inline_text(child_ref, excluded));
                }
            }
            _ => {}
        }
    }
    text
}

fn push_inline(line: &mut String, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(trimmed);
}

fn flush_line(line: &mut String, out: &mut Vec<String>) {
    let trimmed = line.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    line.clear();
}
