//! docmerge - Combine Word documents into a single document.
//!
//! Command-line front end for the `docmerge` library.

mod cli;

use clap::Parser;
use std::process;

use crate::cli::Cli;
use docmerge::config::{Config, OverwriteMode};
use docmerge::error::DocMergeError;
use docmerge::inspect::DocumentInfo;
use docmerge::io::DocxWriter;
use docmerge::merge::merge_files;
use docmerge::output::{
    OutputFormatter, ProgressBar, display_analysis, display_merge_stats,
    display_validation_summary,
};
use docmerge::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Set up `env_logger`; `RUST_LOG` takes precedence over the flags.
fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), DocMergeError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", docmerge::NAME, docmerge::VERSION));
        formatter.blank_line();
    }

    formatter.info("Validating input files...");
    let validator = Validator::with_limits(config.limits);
    let summary = validator.validate_config(&config).await?;

    if formatter.should_print() {
        display_validation_summary(&formatter, &summary);
        formatter.blank_line();
    }

    if config.dry_run {
        return dry_run(&config, &formatter);
    }

    handle_output_overwrite(&config, &formatter)?;

    formatter.info("Merging documents...");
    let mut progress = if formatter.should_print() {
        ProgressBar::auto(config.inputs.len())
    } else {
        ProgressBar::disabled()
    };

    let result = merge_files(&config, |current, total, message| {
        progress.report(current, total, message)
    })
    .await;
    progress.finish();
    let output = result?;

    let write_stats = DocxWriter::new()
        .save_with_stats(output.bytes, &config.output)
        .await?;
    log::info!(
        "Wrote {} in {:.2}s",
        write_stats.output_path.display(),
        write_stats.write_time.as_secs_f64()
    );

    if config.json {
        print_json(&output.stats)?;
        return Ok(());
    }

    if formatter.should_print() {
        formatter.blank_line();
        display_merge_stats(&formatter, &output.stats);
        formatter.blank_line();
        formatter.success(&format!(
            "Successfully created {} ({})",
            config.output.display(),
            write_stats.format_file_size()
        ));
    } else {
        for skipped in &output.stats.skipped {
            formatter.warning(&format!("Skipped {}: {}", skipped.name, skipped.reason));
        }
    }

    Ok(())
}

/// Analyze every input and report what a merge would produce.
fn dry_run(config: &Config, formatter: &OutputFormatter) -> Result<(), DocMergeError> {
    let mut documents = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        match DocumentInfo::from_path(path) {
            Ok(mut info) => {
                info.analyze();
                documents.push(info);
            }
            Err(e) => formatter.warning(&format!("Skipping {}: {}", path.display(), e)),
        }
    }

    if config.json {
        return print_json(&documents);
    }

    display_analysis(formatter, &documents);
    formatter.blank_line();
    formatter.success("Dry run completed successfully");
    formatter.info(&format!("  Output would be: {}", config.output.display()));
    formatter.info("  Run without --dry-run to create the merged document");
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), DocMergeError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DocMergeError::other(format!("Failed to encode JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), DocMergeError> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(DocMergeError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(DocMergeError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| DocMergeError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(DocMergeError::Cancelled),
            }
        }
    }
}
