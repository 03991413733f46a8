//! Crawler module for parallel section extraction
//!
//! This module contains the core extraction logic, including:
//! - The fetch boundary and its HTTP implementation
//! - The ordered strategy chain with validation and fallback
//! - Keyword-anchored section extraction
//! - Per-target retries with timeouts
//! - Bounded-concurrency scheduling

mod chain;
mod fetcher;
mod scheduler;
mod section;
mod task;

pub use chain::{Strategy, StrategyChain, Validation};
pub use fetcher::{
    build_http_client, extract_region, FetchError, FetchOptions, FetchOutcome, Fetcher,
    HttpFetcher,
};
pub use scheduler::TaskScheduler;
pub use section::SectionExtractor;
pub use task::{RetryPolicy, RetryingTask};

use crate::config::Config;
use crate::output::{FileWriter, Persistence, ResultAggregator, RunSummary};
use crate::result::Target;
use std::sync::Arc;
use std::time::Instant;

/// Runs a complete extraction operation
///
/// This is the main entry point for processing a configured URL list:
/// 1. Build the HTTP fetcher and the strategy chain
/// 2. Schedule every target under the concurrency bound
/// 3. Aggregate per-target results into a run summary
/// 4. Persist artifacts and the summary file
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `config_hash` - Content hash of the configuration file, recorded in
///   the summary
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed (individual targets may have failed)
/// * `Err(GleanerError)` - The run itself could not complete
pub async fn run_extraction(config: Config, config_hash: String) -> crate::Result<RunSummary> {
    let targets = Target::from_urls(&config.urls);
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.crawl)?);
    let chain = Arc::new(StrategyChain::from_config(&config));
    let scheduler = TaskScheduler::new(&config.parallel);
    let policy = RetryPolicy::from_config(&config);

    tracing::info!(
        "extracting {} targets with {} workers (strategies: {})",
        targets.len(),
        config.parallel.max_concurrent_workers,
        chain.strategy_names().join(", ")
    );

    let started = Instant::now();
    let results = scheduler.run_all(fetcher, chain, targets, policy).await;
    let mut summary = ResultAggregator::aggregate(results, started.elapsed(), &config_hash)?;

    let writer = FileWriter::new(config.output.clone());
    for result in &summary.results {
        let paths = writer.persist_result(result)?;
        summary.artifacts.extend(paths);
    }
    if let Some(path) = writer.persist_summary(&summary)? {
        tracing::info!("summary written to {}", path.display());
        summary.artifacts.push(path);
    }

    tracing::info!(
        "run complete: {}/{} targets succeeded in {:.1}s",
        summary.successful,
        summary.total,
        summary.total_duration.as_secs_f64()
    );

    Ok(summary)
}
