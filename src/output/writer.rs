//! Artifact persistence
//!
//! The [`Persistence`] trait is the hand-off boundary for extraction
//! results: every successful result and the final summary are each handed
//! off exactly once. [`FileWriter`] implements it by writing html, markdown
//! and json artifacts into the configured output directory.

use crate::config::{OutputConfig, OutputFormat};
use crate::output::aggregator::RunSummary;
use crate::result::ExtractResult;
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing artifacts
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;

/// Hand-off boundary for results and summaries
pub trait Persistence {
    /// Persists one result, returning the paths written
    ///
    /// Failed results produce no artifacts; their record lives in the
    /// summary.
    fn persist_result(&self, result: &ExtractResult) -> PersistResult<Vec<PathBuf>>;

    /// Persists the run summary, returning the path if one was written
    fn persist_summary(&self, summary: &RunSummary) -> PersistResult<Option<PathBuf>>;
}

/// File-based persistence into the configured output directory
pub struct FileWriter {
    config: OutputConfig,
    timestamp: String,
}

impl FileWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            timestamp: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    fn directory(&self) -> &Path {
        Path::new(&self.config.directory)
    }

    fn artifact_path(&self, index: usize, kind: &str, extension: &str) -> PathBuf {
        self.directory().join(format!(
            "{}_url_{:02}_{}_{}.{}",
            self.config.prefix,
            index + 1,
            kind,
            self.timestamp,
            extension
        ))
    }

    fn markdown_artifact(&self, result: &ExtractResult) -> String {
        format!(
            "# URL: {}\n\nMethod: {}\nDuration: {:.1}s\n\n---\n\n{}\n",
            result.target.url,
            result.method,
            result.duration.as_secs_f64(),
            result.content
        )
    }
}

impl Persistence for FileWriter {
    fn persist_result(&self, result: &ExtractResult) -> PersistResult<Vec<PathBuf>> {
        if !result.success {
            tracing::debug!(index = result.target.index, "skipping artifacts for failed target");
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(self.directory())?;
        let mut written = Vec::new();

        for format in &self.config.formats {
            let path = match format {
                OutputFormat::Html => {
                    let path = self.artifact_path(result.target.index, "html", "html");
                    std::fs::write(&path, &result.html)?;
                    path
                }
                OutputFormat::Markdown => {
                    let path = self.artifact_path(result.target.index, "md", "md");
                    std::fs::write(&path, self.markdown_artifact(result))?;
                    path
                }
                OutputFormat::Json => {
                    let path = self.artifact_path(result.target.index, "info", "json");
                    let info = json!({
                        "url": result.target.url,
                        "success": true,
                        "method": result.method,
                        "duration": result.duration.as_secs_f64(),
                        "content_length": result.content_length,
                        "timestamp": self.timestamp,
                    });
                    std::fs::write(&path, serde_json::to_string_pretty(&info)?)?;
                    path
                }
            };
            tracing::debug!(index = result.target.index, "wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn persist_summary(&self, summary: &RunSummary) -> PersistResult<Option<PathBuf>> {
        if !self.config.create_summary {
            return Ok(None);
        }

        std::fs::create_dir_all(self.directory())?;

        let results: Vec<_> = summary
            .results
            .iter()
            .map(|r| {
                json!({
                    "url": r.target.url,
                    "index": r.target.index,
                    "success": r.success,
                    "method": r.method,
                    "duration": r.duration.as_secs_f64(),
                    "content_length": r.content_length,
                    "error": r.error,
                })
            })
            .collect();

        let document = json!({
            "timestamp": self.timestamp,
            "config_hash": summary.config_hash,
            "total_urls": summary.total,
            "successful_urls": summary.successful,
            "failed_urls": summary.failed,
            "total_duration": summary.total_duration.as_secs_f64(),
            "throughput": summary.throughput,
            "results": results,
            "files_created": summary
                .artifacts
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        });

        let path = self
            .directory()
            .join(format!("{}_summary_{}.json", self.config.prefix, self.timestamp));
        std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;

        Ok(Some(path))
    }
}
