//! Bounded-concurrency task scheduler
//!
//! Spawns one tokio task per target and gates them behind a semaphore so at
//! most `max-concurrent-workers` extractions are in flight at once. The
//! semaphore is the only state shared between tasks; permits are granted in
//! FIFO order, so no target waits forever. Results come back in target
//! index order no matter which task finished first, and a task that aborts
//! is converted into a failed result instead of taking the run down.

use crate::config::ParallelConfig;
use crate::crawler::chain::StrategyChain;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::task::{RetryPolicy, RetryingTask};
use crate::result::{ExtractResult, Target};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub struct TaskScheduler {
    semaphore: Arc<Semaphore>,
    batch_delay: Duration,
}

impl TaskScheduler {
    pub fn new(config: &ParallelConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_workers)),
            batch_delay: Duration::from_secs(config.batch_delay),
        }
    }

    /// Runs every target to completion and returns one result per target,
    /// ordered by target index
    pub async fn run_all(
        &self,
        fetcher: Arc<dyn Fetcher>,
        chain: Arc<StrategyChain>,
        targets: Vec<Target>,
        policy: RetryPolicy,
    ) -> Vec<ExtractResult> {
        let total = targets.len();
        let mut handles = Vec::with_capacity(total);

        for target in targets {
            let semaphore = Arc::clone(&self.semaphore);
            let fetcher = Arc::clone(&fetcher);
            let chain = Arc::clone(&chain);
            let policy = policy.clone();
            let recovery = target.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return ExtractResult::failure(target, "scheduler shut down", Duration::ZERO);
                };
                tracing::info!(index = target.index, url = %target.url, "starting extraction");
                RetryingTask::new(policy).run(fetcher.as_ref(), &chain, &target).await
            });
            handles.push((recovery, handle));

            if !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        let mut results = Vec::with_capacity(total);
        for (done, (target, handle)) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(index = target.index, "extraction task aborted: {}", e);
                    ExtractResult::failure(target, format!("task aborted: {}", e), Duration::ZERO)
                }
            };
            tracing::info!(
                "[{}/{}] {} {} ({:.1}s)",
                done + 1,
                total,
                if result.success { "ok" } else { "failed" },
                result.target.url,
                result.duration.as_secs_f64()
            );
            results.push(result);
        }

        results.sort_unstable_by_key(|r| r.target.index);
        results
    }
}
