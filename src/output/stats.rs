//! Console report for a completed run

use crate::output::aggregator::RunSummary;

const PREVIEW_COUNT: usize = 3;
const PREVIEW_CHARS: usize = 300;

/// Prints the run summary to stdout in a formatted manner
pub fn print_report(summary: &RunSummary) {
    println!("=== Extraction Summary ===\n");

    println!("Targets:    {}", summary.total);
    println!("Successful: {}", summary.successful);
    println!("Failed:     {}", summary.failed);
    println!("Duration:   {:.1}s", summary.total_duration.as_secs_f64());
    println!("Throughput: {:.2} URLs/sec", summary.throughput);
    println!("Artifacts:  {}", summary.artifacts.len());
    println!();

    println!("Per-target results:");
    for result in &summary.results {
        if result.success {
            println!(
                "  [{:>2}] ok      {:<12} {:.1}s  {:>6} chars  {}",
                result.target.index + 1,
                result.method,
                result.duration.as_secs_f64(),
                result.content_length,
                result.target.url
            );
        } else {
            println!(
                "  [{:>2}] failed  {}  ({})",
                result.target.index + 1,
                result.target.url,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let previews: Vec<_> = summary
        .results
        .iter()
        .filter(|r| r.success)
        .take(PREVIEW_COUNT)
        .collect();

    if !previews.is_empty() {
        println!("\nPreview:");
        for result in previews {
            println!("{}", "-".repeat(72));
            println!(
                "[{}] {} ({}, {:.1}s)",
                result.target.index + 1,
                result.target.url,
                result.method,
                result.duration.as_secs_f64()
            );
            println!("{}", truncate(&result.content, PREVIEW_CHARS));
        }
        println!("{}", "-".repeat(72));
    }
}

fn truncate(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        content.to_string()
    } else {
        let cut: String = content.chars().take(limit).collect();
        format!("{}...", cut)
    }
}
