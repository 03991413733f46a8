use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded in the run summary so a summary can be traced back
/// to the exact configuration that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r###"
urls = ["https://example.com/page-1", "https://example.com/page-2"]

[parallel]
max-concurrent-workers = 2
per-url-timeout = 30
batch-delay = 1

[crawl]
excluded-tags = ["script", "style"]
word-count-threshold = 3
cache-mode = "bypass"
max-retries = 2
delay-between-requests = 1

[selectors]
primary = "#sub-question-2"
fallback = ".box-question"
alternative = ".solution-box"

[keywords]
target = ["detailed solution", "solution guide"]

[section]
heading-marker = "##"
min-lines = 10

[output]
directory = "./output"
formats = ["markdown", "json"]
prefix = "extract"
create-summary = true
"###;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.parallel.max_concurrent_workers, 2);
        assert_eq!(config.crawl.max_retries, 2);
        assert_eq!(config.selectors.primary, "#sub-question-2");
        assert_eq!(config.selectors.fallback.as_deref(), Some(".box-question"));
        assert_eq!(config.keywords.target.len(), 2);
        assert_eq!(config.section.min_lines, 10);
        assert!(config.output.create_summary);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let minimal = r#"
urls = ["https://example.com/page"]

[parallel]

[crawl]

[selectors]
primary = ".content"

[keywords]
target = []

[output]
directory = "./output"
formats = ["markdown"]
prefix = "extract"
"#;
        let file = create_temp_config(minimal);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.parallel.max_concurrent_workers, 3);
        assert_eq!(config.parallel.per_url_timeout, 45);
        assert_eq!(config.parallel.batch_delay, 0);
        assert_eq!(config.crawl.max_retries, 3);
        assert_eq!(config.section.heading_marker, "##");
        assert!(config.selectors.fallback.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_compute_config_hash_is_stable() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
