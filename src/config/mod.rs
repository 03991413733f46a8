//! Configuration module for gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Targets: {}", config.urls.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheMode, Config, CrawlConfig, KeywordsConfig, OutputConfig, OutputFormat, ParallelConfig,
    SectionConfig, SelectorsConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
