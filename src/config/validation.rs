use crate::config::types::{
    Config, CrawlConfig, KeywordsConfig, OutputConfig, ParallelConfig, SectionConfig,
    SelectorsConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_urls(&config.urls)?;
    validate_parallel_config(&config.parallel)?;
    validate_crawl_config(&config.crawl)?;
    validate_selectors(&config.selectors, &config.keywords)?;
    validate_section_config(&config.section)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "urls must contain at least one entry".to_string(),
        ));
    }

    for url in urls {
        let parsed = Url::parse(url)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}' must use the http or https scheme",
                url
            )));
        }
    }

    Ok(())
}

fn validate_parallel_config(config: &ParallelConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_workers < 1 || config.max_concurrent_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-workers must be between 1 and 100, got {}",
            config.max_concurrent_workers
        )));
    }

    if config.per_url_timeout < 1 {
        return Err(ConfigError::Validation(
            "per-url-timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selectors(
    selectors: &SelectorsConfig,
    keywords: &KeywordsConfig,
) -> Result<(), ConfigError> {
    if selectors.primary.trim().is_empty() {
        return Err(ConfigError::Validation(
            "selectors.primary cannot be empty".to_string(),
        ));
    }

    for (name, selector) in [
        ("fallback", &selectors.fallback),
        ("alternative", &selectors.alternative),
    ] {
        if let Some(sel) = selector {
            if sel.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "selectors.{} cannot be empty when present",
                    name
                )));
            }
        }
    }

    // Fallback strategies anchor on keywords, so they need at least one.
    let has_fallback = selectors.fallback.is_some() || selectors.alternative.is_some();
    if has_fallback && keywords.target.iter().all(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords.target must contain at least one keyword when fallback selectors are configured"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_section_config(config: &SectionConfig) -> Result<(), ConfigError> {
    if config.heading_marker.is_empty() {
        return Err(ConfigError::Validation(
            "section.heading-marker cannot be empty".to_string(),
        ));
    }

    if config.min_lines < 1 {
        return Err(ConfigError::Validation(format!(
            "section.min-lines must be >= 1, got {}",
            config.min_lines
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output.directory cannot be empty".to_string(),
        ));
    }

    if config.prefix.is_empty() {
        return Err(ConfigError::Validation(
            "output.prefix cannot be empty".to_string(),
        ));
    }

    if config.formats.is_empty() {
        return Err(ConfigError::Validation(
            "output.formats must contain at least one format".to_string(),
        ));
    }

    Ok(())
}
