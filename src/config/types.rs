use serde::Deserialize;

/// Main configuration structure for gleaner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Ordered list of URLs to extract from
    pub urls: Vec<String>,

    pub parallel: ParallelConfig,
    pub crawl: CrawlConfig,
    pub selectors: SelectorsConfig,
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub section: SectionConfig,
    pub output: OutputConfig,
}

/// Worker-pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ParallelConfig {
    /// Maximum number of concurrently active extractions
    #[serde(rename = "max-concurrent-workers", default = "default_workers")]
    pub max_concurrent_workers: usize,

    /// Timeout for a single extraction attempt (seconds)
    #[serde(rename = "per-url-timeout", default = "default_per_url_timeout")]
    pub per_url_timeout: u64,

    /// Optional pacing between task dispatches (seconds)
    #[serde(rename = "batch-delay", default)]
    pub batch_delay: u64,
}

/// Fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Tags whose subtrees are dropped during text extraction
    #[serde(rename = "excluded-tags", default = "default_excluded_tags")]
    pub excluded_tags: Vec<String>,

    /// Minimum word count for a text line to be kept
    #[serde(rename = "word-count-threshold", default = "default_word_count")]
    pub word_count_threshold: usize,

    /// Whether page bodies are cached for the duration of the run
    #[serde(rename = "cache-mode", default)]
    pub cache_mode: CacheMode,

    /// Maximum number of extraction attempts per URL
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between attempts for the same URL (seconds)
    #[serde(rename = "delay-between-requests", default = "default_request_delay")]
    pub delay_between_requests: u64,

    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Body cache behavior for the HTTP fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Every fetch hits the network
    #[default]
    Bypass,

    /// Page bodies are reused across strategies within a run
    Enabled,
}

/// The ordered extraction selectors
///
/// `primary` is always tried first; `fallback` and `alternative` are only
/// consulted when the preceding selector yields no valid content.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorsConfig {
    pub primary: String,
    #[serde(default)]
    pub fallback: Option<String>,
    #[serde(default)]
    pub alternative: Option<String>,
}

/// Keyword anchors for locating the target section
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default)]
    pub target: Vec<String>,
}

/// Tunables for the section-boundary heuristic
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Line prefix that marks a new top-level heading
    #[serde(rename = "heading-marker", default = "default_heading_marker")]
    pub heading_marker: String,

    /// A heading only terminates a captured section once the buffer holds
    /// more than this many lines
    #[serde(rename = "min-lines", default = "default_min_lines")]
    pub min_lines: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            heading_marker: default_heading_marker(),
            min_lines: default_min_lines(),
        }
    }
}

/// Artifact output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory artifacts are written into
    pub directory: String,

    /// Formats to emit for each successful result
    pub formats: Vec<OutputFormat>,

    /// File name prefix for all artifacts
    pub prefix: String,

    /// Whether a run summary JSON file is written
    #[serde(rename = "create-summary", default = "default_create_summary")]
    pub create_summary: bool,
}

/// Supported artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Markdown,
    Json,
}

fn default_workers() -> usize {
    3
}

fn default_per_url_timeout() -> u64 {
    45
}

fn default_excluded_tags() -> Vec<String> {
    ["script", "style", "nav", "footer", "header", "aside", "noscript"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_word_count() -> usize {
    3
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_delay() -> u64 {
    1
}

fn default_user_agent() -> String {
    "gleaner/1.0 (+https://github.com/gleaner)".to_string()
}

fn default_heading_marker() -> String {
    "##".to_string()
}

fn default_min_lines() -> usize {
    10
}

fn default_create_summary() -> bool {
    true
}
