//! Result aggregation
//!
//! Collapses the scheduler's per-target results into a run summary with
//! counts, wall-clock duration, and throughput. Aggregation is a pure
//! computation: the same result set always produces the same summary.

use crate::result::ExtractResult;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Structural failure of a whole run
///
/// Unlike per-target failures, which live inside the summary, this one
/// propagates to the caller.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("no results to aggregate")]
    Empty,
}

/// Summary of a completed extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,

    /// Wall-clock span of the whole run
    pub total_duration: Duration,

    /// Targets per second over the whole run
    pub throughput: f64,

    /// Hash of the configuration that produced this run
    pub config_hash: String,

    /// One result per target, ordered by target index
    pub results: Vec<ExtractResult>,

    /// Paths of artifacts written for this run
    pub artifacts: Vec<PathBuf>,
}

pub struct ResultAggregator;

impl ResultAggregator {
    /// Computes a summary from the completed result set
    pub fn aggregate(
        mut results: Vec<ExtractResult>,
        total_duration: Duration,
        config_hash: &str,
    ) -> Result<RunSummary, AggregationError> {
        if results.is_empty() {
            return Err(AggregationError::Empty);
        }

        results.sort_unstable_by_key(|r| r.target.index);

        let total = results.len();
        let successful = results.iter().filter(|r| r.success).count();
        let failed = total - successful;

        let seconds = total_duration.as_secs_f64();
        let throughput = if seconds > 0.0 {
            total as f64 / seconds
        } else {
            0.0
        };

        Ok(RunSummary {
            total,
            successful,
            failed,
            total_duration,
            throughput,
            config_hash: config_hash.to_string(),
            results,
            artifacts: Vec::new(),
        })
    }
}
