//! Output module for aggregating results and persisting artifacts
//!
//! This module handles:
//! - Aggregating per-target results into a run summary
//! - Writing per-target artifacts and the summary file
//! - Printing the console report

mod aggregator;
mod stats;
mod writer;

pub use aggregator::{AggregationError, ResultAggregator, RunSummary};
pub use stats::print_report;
pub use writer::{FileWriter, PersistError, PersistResult, Persistence};
