//! Gleaner: a parallel content-section extractor
//!
//! This crate crawls a list of URLs concurrently and extracts a target
//! content section from each page, trying an ordered chain of CSS-selector
//! strategies with validation and fallback, retrying transient failures,
//! and aggregating per-target results into a deterministic run summary.

pub mod config;
pub mod crawler;
pub mod output;
pub mod result;

use thiserror::Error;

/// Main error type for gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] output::AggregationError),

    #[error("Persistence error: {0}")]
    Persist(#[from] output::PersistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use output::RunSummary;
pub use result::{ExtractResult, Target};
