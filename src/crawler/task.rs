//! Per-target retry wrapper
//!
//! Runs the full strategy chain for one target under a per-attempt timeout,
//! retrying failed attempts after a delay until the retry budget is spent.

use crate::config::Config;
use crate::crawler::chain::StrategyChain;
use crate::crawler::fetcher::Fetcher;
use crate::result::{ExtractResult, Target};
use std::time::{Duration, Instant};

/// Retry limits shared by every task in a run
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_retries: u32,

    /// Budget for a single chain resolution
    pub per_attempt_timeout: Duration,

    /// Pause between consecutive attempts for the same target
    pub delay_between_attempts: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.crawl.max_retries,
            per_attempt_timeout: Duration::from_secs(config.parallel.per_url_timeout),
            delay_between_attempts: Duration::from_secs(config.crawl.delay_between_requests),
        }
    }
}

/// Executes the strategy chain for one target with bounded retries
///
/// A timed-out attempt counts against the retry budget exactly like a
/// chain that exhausted its strategies. Holds no state shared with other
/// tasks.
pub struct RetryingTask {
    policy: RetryPolicy,
}

impl RetryingTask {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn run(
        &self,
        fetcher: &dyn Fetcher,
        chain: &StrategyChain,
        target: &Target,
    ) -> ExtractResult {
        let started = Instant::now();
        let attempts = self.policy.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                tracing::debug!(
                    index = target.index,
                    attempt,
                    attempts,
                    "retrying after {:?}",
                    self.policy.delay_between_attempts
                );
                tokio::time::sleep(self.policy.delay_between_attempts).await;
            }

            match tokio::time::timeout(
                self.policy.per_attempt_timeout,
                chain.resolve(fetcher, target),
            )
            .await
            {
                Ok(result) if result.success => {
                    let mut result = result;
                    result.duration = started.elapsed();
                    tracing::info!(
                        index = target.index,
                        method = %result.method,
                        chars = result.content_length,
                        "extracted in {:.1}s",
                        result.duration.as_secs_f64()
                    );
                    return result;
                }
                Ok(result) => {
                    last_error = result
                        .error
                        .unwrap_or_else(|| "no strategy produced valid content".to_string());
                    tracing::warn!(
                        index = target.index,
                        attempt,
                        attempts,
                        "attempt failed: {}",
                        last_error
                    );
                }
                Err(_) => {
                    last_error = format!(
                        "attempt timed out after {}s",
                        self.policy.per_attempt_timeout.as_secs()
                    );
                    tracing::warn!(index = target.index, attempt, attempts, "{}", last_error);
                }
            }
        }

        ExtractResult::failure(
            target.clone(),
            format!("all {} attempts failed: {}", attempts, last_error),
            started.elapsed(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheMode, SectionConfig};
    use crate::crawler::chain::{Strategy, Validation};
    use crate::crawler::fetcher::{FetchError, FetchOptions, FetchOutcome};
    use crate::crawler::section::SectionExtractor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingFetcher {
        calls: AtomicU32,
        fail_first: u32,
        delay: Duration,
    }

    impl CountingFetcher {
        fn always_failing() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_first: u32::MAX,
                delay: Duration::ZERO,
            }
        }

        fn failing_first(n: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_first: n,
                delay: Duration::ZERO,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_first: 0,
                delay,
            }
        }
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(
            &self,
            url: &str,
            _selector: &str,
            _options: &FetchOptions,
        ) -> Result<FetchOutcome, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if call < self.fail_first {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                });
            }
            Ok(FetchOutcome {
                content: "valid content".to_string(),
                html: "<div>valid content</div>".to_string(),
            })
        }
    }

    fn single_strategy_chain() -> StrategyChain {
        let options = FetchOptions {
            excluded_tags: vec![],
            word_count_threshold: 1,
            cache_mode: CacheMode::Bypass,
        };
        StrategyChain::new(
            vec![Strategy {
                name: "primary".to_string(),
                selector: ".content".to_string(),
                validation: Validation::NonEmpty,
                extract_section: false,
            }],
            vec![],
            SectionExtractor::new(vec![], &SectionConfig::default()),
            options,
        )
    }

    fn quick_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            per_attempt_timeout: Duration::from_millis(200),
            delay_between_attempts: Duration::from_millis(1),
        }
    }

    fn target() -> Target {
        Target {
            index: 0,
            url: "https://example.com/page".to_string(),
        }
    }

    #[tokio::test]
    async fn test_always_failing_fetcher_uses_whole_retry_budget() {
        let fetcher = CountingFetcher::always_failing();
        let chain = single_strategy_chain();
        let task = RetryingTask::new(quick_policy(3));

        let result = task.run(&fetcher, &chain, &target()).await;

        assert!(!result.success);
        // One strategy per attempt, three attempts
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
        assert!(result.error.unwrap().starts_with("all 3 attempts failed"));
    }

    #[tokio::test]
    async fn test_success_stops_retrying() {
        let fetcher = CountingFetcher::failing_first(1);
        let chain = single_strategy_chain();
        let task = RetryingTask::new(quick_policy(3));

        let result = task.run(&fetcher, &chain, &target()).await;

        assert!(result.success);
        assert_eq!(result.method, "primary");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failed_attempt() {
        let fetcher = CountingFetcher::slow(Duration::from_millis(80));
        let chain = single_strategy_chain();
        let task = RetryingTask::new(RetryPolicy {
            max_retries: 2,
            per_attempt_timeout: Duration::from_millis(10),
            delay_between_attempts: Duration::from_millis(1),
        });

        let result = task.run(&fetcher, &chain, &target()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out"));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duration_covers_all_attempts() {
        let fetcher = CountingFetcher::always_failing();
        let chain = single_strategy_chain();
        let task = RetryingTask::new(RetryPolicy {
            max_retries: 2,
            per_attempt_timeout: Duration::from_millis(200),
            delay_between_attempts: Duration::from_millis(20),
        });

        let result = task.run(&fetcher, &chain, &target()).await;

        assert!(result.duration >= Duration::from_millis(20));
    }
}
