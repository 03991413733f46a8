//! Gleaner main entry point
//!
//! Command-line interface for the parallel section extractor.

use anyhow::Context;
use clap::Parser;
use gleaner::config::load_config_with_hash;
use gleaner::crawler::run_extraction;
use gleaner::output::print_report;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gleaner: a parallel content-section extractor
///
/// Gleaner crawls a configured list of URLs concurrently and extracts a
/// target content section from each page, trying an ordered chain of
/// selector strategies with retries and fallback, then writes per-URL
/// artifacts and a run summary.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A parallel content-section extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Skip the confirmation prompt before dispatch
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if !cli.yes && !confirm_dispatch(&config)? {
        println!("Aborted.");
        return Ok(());
    }

    let summary = run_extraction(config, config_hash).await?;

    print_report(&summary);

    if summary.successful == 0 {
        println!("\nNo target succeeded. Check the URLs, the selectors and the keyword list.");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &gleaner::Config) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Parallel:");
    println!("  Max workers: {}", config.parallel.max_concurrent_workers);
    println!("  Per-URL timeout: {}s", config.parallel.per_url_timeout);
    println!("  Batch delay: {}s", config.parallel.batch_delay);

    println!("\nRetry:");
    println!("  Max retries: {}", config.crawl.max_retries);
    println!(
        "  Delay between requests: {}s",
        config.crawl.delay_between_requests
    );

    println!("\nSelectors:");
    println!("  primary: {}", config.selectors.primary);
    if let Some(fallback) = &config.selectors.fallback {
        println!("  fallback: {}", fallback);
    }
    if let Some(alternative) = &config.selectors.alternative {
        println!("  alternative: {}", alternative);
    }

    println!("\nKeywords ({}):", config.keywords.target.len());
    for keyword in &config.keywords.target {
        println!("  - {}", keyword);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Prefix: {}", config.output.prefix);
    println!("  Create summary: {}", config.output.create_summary);

    println!("\nURLs ({}):", config.urls.len());
    for (i, url) in config.urls.iter().enumerate() {
        println!("  {:2}. {}", i + 1, url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would extract {} URLs", config.urls.len());
}

/// Asks the user to confirm before dispatching the run
fn confirm_dispatch(config: &gleaner::Config) -> std::io::Result<bool> {
    println!("URLs to be crawled:");
    for (i, url) in config.urls.iter().enumerate() {
        println!("  {:2}. {}", i + 1, url);
    }

    print!(
        "\nProceed with crawling {} URLs using {} workers? [y/N] ",
        config.urls.len(),
        config.parallel.max_concurrent_workers
    );
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
