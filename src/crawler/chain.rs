//! Ordered strategy chain with validation and fallback
//!
//! Each strategy pairs a CSS selector with a validation rule. The chain
//! tries strategies in declared order and short-circuits on the first one
//! whose fetch succeeds and whose content passes validation. A fetch error
//! is not fatal to the chain; it just moves on to the next strategy.

use crate::config::Config;
use crate::crawler::fetcher::{FetchOptions, Fetcher};
use crate::crawler::section::SectionExtractor;
use crate::result::{ExtractResult, Target};
use std::time::Instant;

/// Content validation rule applied after a successful fetch
#[derive(Debug, Clone)]
pub enum Validation {
    /// Trimmed content must be non-empty
    NonEmpty,

    /// Content must contain at least this many words
    MinWords(usize),

    /// Content must contain one of the target keywords (case-insensitive)
    ContainsKeyword,
}

impl Validation {
    pub fn accepts(&self, content: &str, keywords: &[String]) -> bool {
        match self {
            Validation::NonEmpty => !content.trim().is_empty(),
            Validation::MinWords(count) => content.split_whitespace().count() >= *count,
            Validation::ContainsKeyword => {
                let content = content.to_lowercase();
                keywords
                    .iter()
                    .any(|k| !k.trim().is_empty() && content.contains(&k.to_lowercase()))
            }
        }
    }
}

/// A named (selector, validation) pair
#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub selector: String,
    pub validation: Validation,

    /// When set, the strategy only succeeds if the section extractor finds
    /// the keyword-anchored section, which then replaces the content
    pub extract_section: bool,
}

/// Ordered list of extraction strategies, shared read-only across tasks
pub struct StrategyChain {
    strategies: Vec<Strategy>,
    keywords: Vec<String>,
    section: SectionExtractor,
    options: FetchOptions,
}

impl StrategyChain {
    pub fn new(
        strategies: Vec<Strategy>,
        keywords: Vec<String>,
        section: SectionExtractor,
        options: FetchOptions,
    ) -> Self {
        Self {
            strategies,
            keywords,
            section,
            options,
        }
    }

    /// Builds the primary/fallback/alternative chain from configuration
    ///
    /// The primary selector succeeds on any sufficiently wordy content.
    /// Fallback selectors cast a wider net, so they must hit a target
    /// keyword and yield the anchored section.
    pub fn from_config(config: &Config) -> Self {
        let mut strategies = vec![Strategy {
            name: "primary".to_string(),
            selector: config.selectors.primary.clone(),
            validation: Validation::MinWords(config.crawl.word_count_threshold.max(1)),
            extract_section: false,
        }];

        if let Some(selector) = &config.selectors.fallback {
            strategies.push(Strategy {
                name: "fallback".to_string(),
                selector: selector.clone(),
                validation: Validation::ContainsKeyword,
                extract_section: true,
            });
        }

        if let Some(selector) = &config.selectors.alternative {
            strategies.push(Strategy {
                name: "alternative".to_string(),
                selector: selector.clone(),
                validation: Validation::ContainsKeyword,
                extract_section: true,
            });
        }

        let keywords = config.keywords.target.clone();
        let section = SectionExtractor::new(keywords.clone(), &config.section);

        Self::new(strategies, keywords, section, FetchOptions::from(&config.crawl))
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name.as_str()).collect()
    }

    /// Tries each strategy in order and returns the first valid content
    ///
    /// Always returns a result: an empty chain or an exhausted chain yields
    /// a failure result, never an error.
    pub async fn resolve(&self, fetcher: &dyn Fetcher, target: &Target) -> ExtractResult {
        let started = Instant::now();

        for strategy in &self.strategies {
            tracing::debug!(
                index = target.index,
                strategy = %strategy.name,
                selector = %strategy.selector,
                "trying strategy"
            );

            let outcome = match fetcher.fetch(&target.url, &strategy.selector, &self.options).await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(
                        index = target.index,
                        strategy = %strategy.name,
                        "fetch failed: {}",
                        e
                    );
                    continue;
                }
            };

            if !strategy.validation.accepts(&outcome.content, &self.keywords) {
                tracing::debug!(
                    index = target.index,
                    strategy = %strategy.name,
                    "content failed validation"
                );
                continue;
            }

            let (content, html) = if strategy.extract_section {
                match self.section.extract(&outcome.content) {
                    Some(lines) => {
                        let joined = lines.join("\n");
                        let html = format!("<div class=\"target-section\">{}</div>", joined);
                        (joined, html)
                    }
                    None => {
                        tracing::debug!(
                            index = target.index,
                            strategy = %strategy.name,
                            "no target section in content"
                        );
                        continue;
                    }
                }
            } else {
                (outcome.content, outcome.html)
            };

            tracing::debug!(
                index = target.index,
                strategy = %strategy.name,
                chars = content.chars().count(),
                "strategy produced valid content"
            );
            return ExtractResult::success(
                target.clone(),
                &strategy.name,
                content,
                html,
                started.elapsed(),
            );
        }

        ExtractResult::failure(
            target.clone(),
            "no strategy produced valid content",
            started.elapsed(),
        )
    }
}
