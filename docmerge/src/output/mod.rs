//! Output formatting and display for docmerge.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The merge progress bar
//! - Dry-run analysis listings
//! - Summary reports
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::output::OutputFormatter;
//! use docmerge::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::inspect::DocumentInfo;
use crate::io::LoadStatistics;
use crate::merge::MergeStats;
use crate::validation::ValidationSummary;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display validation summary to the user.
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    if summary.files_failed > 0 {
        formatter.warning(&format!(
            "{} file(s) failed validation and will be skipped",
            summary.files_failed
        ));
    }

    formatter.info(&format!(
        "Validated {} file(s): {} paragraphs, {}",
        summary.files_validated,
        summary.total_paragraphs,
        summary.format_total_size()
    ));
}

/// Display load statistics to the user.
pub fn display_load_statistics(formatter: &OutputFormatter, stats: &LoadStatistics) {
    if stats.failure_count > 0 {
        formatter.warning(&format!(
            "{} file(s) failed to load",
            stats.failure_count
        ));
    }

    formatter.debug(&format!(
        "Loaded {} file(s) in {:.2}s: {} paragraphs, {}",
        stats.success_count,
        stats.total_time.as_secs_f64(),
        stats.total_paragraphs,
        stats.format_total_size()
    ));
}

/// Describe one analyzed document in a single line.
pub fn describe_analysis(info: &DocumentInfo) -> String {
    match (info.analysis(), info.error_message()) {
        (Some(a), _) => format!(
            "{}: {} paragraphs, {} tables, {} images, ~{} page(s)",
            info.name, a.paragraphs, a.tables, a.images, a.pages_estimate
        ),
        (None, Some(err)) => format!("{}: invalid ({})", info.name, first_line(err)),
        (None, None) => format!("{}: not analyzed", info.name),
    }
}

/// List the analysis of every input, as shown by a dry run.
pub fn display_analysis(formatter: &OutputFormatter, documents: &[DocumentInfo]) {
    formatter.section("Documents to merge:");
    for (i, info) in documents.iter().enumerate() {
        let line = describe_analysis(info);
        if info.is_valid() {
            formatter.list_item(i + 1, &line);
        } else {
            formatter.warning(&format!("{}. {}", i + 1, line));
        }
    }

    let estimated: usize = documents
        .iter()
        .filter_map(DocumentInfo::analysis)
        .map(|a| a.pages_estimate)
        .sum();
    formatter.blank_line();
    formatter.info(&format!("Estimated output: ~{estimated} page(s)"));
}

/// Display the final merge report.
pub fn display_merge_stats(formatter: &OutputFormatter, stats: &MergeStats) {
    for skipped in &stats.skipped {
        formatter.warning(&format!(
            "Skipped {}: {}",
            skipped.name,
            first_line(&skipped.reason)
        ));
    }

    formatter.section("Summary:");
    formatter.detail("Documents merged", &stats.total_docs.to_string());
    formatter.detail("Paragraphs", &stats.total_paragraphs.to_string());
    formatter.detail("Tables", &stats.total_tables.to_string());
    formatter.detail("Images", &stats.total_images.to_string());
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail("Output size", &stats.format_output_size());
    formatter.detail(
        "Time",
        &format!("{:.2}s", stats.processing_seconds()),
    );

    if formatter.is_verbose() {
        formatter.section("Merge order:");
        for (i, name) in stats.merged.iter().enumerate() {
            formatter.list_item(i + 1, name);
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}
