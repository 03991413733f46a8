//! Core data model for extraction runs
//!
//! A [`Target`] identifies one unit of work (a URL plus its position in the
//! input list). Every target produces exactly one [`ExtractResult`], no
//! matter how many strategies or retries were attempted for it.

use std::time::Duration;

/// One unit of work: a URL to be processed exactly once end-to-end
///
/// The index is the position of the URL in the configured input list and
/// identifies the target throughout its lifecycle, independent of the order
/// in which concurrent extractions happen to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Position in the input URL list
    pub index: usize,

    /// The URL to extract from
    pub url: String,
}

impl Target {
    /// Builds the target list from an ordered list of URLs
    pub fn from_urls(urls: &[String]) -> Vec<Target> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| Target {
                index,
                url: url.clone(),
            })
            .collect()
    }
}

/// The outcome of processing one target
///
/// Constructed by every code path (strategy success, retry exhaustion,
/// task abort), so downstream consumers never deal with a partially-shaped
/// result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractResult {
    /// The target this result belongs to
    pub target: Target,

    /// Whether any strategy produced valid content
    pub success: bool,

    /// Name of the strategy that produced the content, or "failed"
    pub method: String,

    /// Extracted text content (possibly a refined section of the page)
    pub content: String,

    /// HTML of the matched region
    pub html: String,

    /// Error description for failed targets
    pub error: Option<String>,

    /// Wall-clock time spent on this target, including retries
    pub duration: Duration,

    /// Character count of the extracted content
    pub content_length: usize,
}

impl ExtractResult {
    /// Creates a successful result for a target
    pub fn success(
        target: Target,
        method: &str,
        content: String,
        html: String,
        duration: Duration,
    ) -> Self {
        let content_length = content.chars().count();
        Self {
            target,
            success: true,
            method: method.to_string(),
            content,
            html,
            error: None,
            duration,
            content_length,
        }
    }

    /// Creates a failed result for a target
    pub fn failure(target: Target, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            target,
            success: false,
            method: "failed".to_string(),
            content: String::new(),
            html: String::new(),
            error: Some(error.into()),
            duration,
            content_length: 0,
        }
    }
}
