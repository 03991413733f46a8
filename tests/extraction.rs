//! Integration tests for the extraction pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! pipeline end-to-end through the real HTTP fetcher and file writer.

use gleaner::config::{
    CacheMode, Config, CrawlConfig, KeywordsConfig, OutputConfig, OutputFormat, ParallelConfig,
    SectionConfig, SelectorsConfig,
};
use gleaner::crawler::run_extraction;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(urls: Vec<String>, output_dir: &TempDir) -> Config {
    Config {
        urls,
        parallel: ParallelConfig {
            max_concurrent_workers: 2,
            per_url_timeout: 10,
            batch_delay: 0,
        },
        crawl: CrawlConfig {
            excluded_tags: vec!["script".to_string(), "style".to_string()],
            word_count_threshold: 1,
            cache_mode: CacheMode::Bypass,
            max_retries: 2,
            delay_between_requests: 0,
            user_agent: "GleanerTest/1.0".to_string(),
        },
        selectors: SelectorsConfig {
            primary: "#guide".to_string(),
            fallback: Some(".content".to_string()),
            alternative: None,
        },
        keywords: KeywordsConfig {
            target: vec!["solution guide".to_string()],
        },
        section: SectionConfig {
            heading_marker: "##".to_string(),
            min_lines: 10,
        },
        output: OutputConfig {
            directory: output_dir.path().to_string_lossy().to_string(),
            formats: vec![OutputFormat::Markdown, OutputFormat::Json],
            prefix: "test".to_string(),
            create_summary: true,
        },
    }
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_end_to_end_mixed_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // doc1: the primary selector matches directly
    Mock::given(method("GET"))
        .and(path("/doc1"))
        .respond_with(html_response(
            r#"<html><body>
            <div id="guide"><p>primary content with several words</p></div>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    // doc2: no primary region, but the fallback region holds the
    // keyword-anchored section
    Mock::given(method("GET"))
        .and(path("/doc2"))
        .respond_with(html_response(
            r#"<html><body>
            <div class="content">
                <p>some page noise</p>
                <h2>Solution Guide</h2>
                <p>step one of the answer</p>
                <p>step two of the answer</p>
            </div>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    // doc3 has no mock and returns 404, exhausting every attempt

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(
        vec![
            format!("{}/doc1", base_url),
            format!("{}/doc2", base_url),
            format!("{}/doc3", base_url),
        ],
        &output_dir,
    );

    let summary = run_extraction(config, "testhash".to_string())
        .await
        .expect("run should complete despite per-target failures");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.config_hash, "testhash");

    // Results are ordered by target index
    for (i, result) in summary.results.iter().enumerate() {
        assert_eq!(result.target.index, i);
    }

    assert_eq!(summary.results[0].method, "primary");
    assert!(summary.results[0]
        .content
        .contains("primary content with several words"));

    assert_eq!(summary.results[1].method, "fallback");
    assert!(summary.results[1].content.starts_with("## Solution Guide"));
    assert!(summary.results[1].content.contains("step two of the answer"));

    assert!(!summary.results[2].success);
    assert!(summary.results[2].error.is_some());

    // Two artifacts per successful target plus the summary file
    assert_eq!(summary.artifacts.len(), 5);
    for artifact in &summary.artifacts {
        assert!(artifact.exists(), "missing artifact {}", artifact.display());
    }

    let summary_path = summary
        .artifacts
        .iter()
        .find(|p| p.to_string_lossy().contains("summary"))
        .expect("summary file should be written");
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary_path).unwrap()).unwrap();
    assert_eq!(parsed["total_urls"], 3);
    assert_eq!(parsed["successful_urls"], 2);
}

#[tokio::test]
async fn test_transient_error_recovers_on_retry() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // First request fails with a 503, the retry gets the page
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html_response(
            r#"<html><body><div id="guide"><p>recovered page content</p></div></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = create_test_config(vec![format!("{}/flaky", base_url)], &output_dir);
    // Single-strategy chain so the retry, not the fallback, does the work
    config.selectors.fallback = None;
    config.keywords.target.clear();

    let summary = run_extraction(config, "testhash".to_string()).await.unwrap();

    assert_eq!(summary.successful, 1);
    assert_eq!(summary.results[0].method, "primary");
    assert!(summary.results[0].content.contains("recovered page content"));
}

#[tokio::test]
async fn test_zero_successes_is_a_completed_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(
        vec![
            format!("{}/missing-1", base_url),
            format!("{}/missing-2", base_url),
        ],
        &output_dir,
    );

    let summary = run_extraction(config, "testhash".to_string())
        .await
        .expect("a run with zero successes still completes");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 2);
    assert!(summary.results.iter().all(|r| !r.success));

    // No per-target artifacts, only the summary file
    assert_eq!(summary.artifacts.len(), 1);
}
