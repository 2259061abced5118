//! Document merging operations.
//!
//! This module provides the merge engine:
//! - In-order appending of source documents to a master document
//! - Page breaks between documents without blank pages
//! - Optional numbered headers, separators, cover page and table of contents
//! - Two interchangeable append strategies
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::config::Config;
//! use docmerge::merge::merge_files;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(
//!     vec![PathBuf::from("a.docx"), PathBuf::from("b.docx")],
//!     PathBuf::from("merged.docx"),
//! );
//!
//! let output = merge_files(&config, |_, _, _| {}).await?;
//! println!("Merged {} documents", output.stats.total_docs);
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod passes;
pub mod strategy;

pub use merger::{CancelFlag, MergeOutput, MergeStats, Merger, SkippedDocument, append_document};
pub use passes::{TOC_HEADING, add_cover_page, add_table_of_contents};
pub use strategy::{
    AppendContext, BodyComposer, BreakType, Composer, ComposerDelegate, ManualSplicer,
    MergeStrategy, strategy_for,
};

use crate::config::Config;
use crate::error::{DocMergeError, Result};
use crate::inspect::DocumentInfo;
use crate::io::DocxReader;

/// Merge the input files of a configuration.
///
/// Convenience function that describes the inputs, creates a merger and
/// performs the merge. Inputs that cannot be described (missing, not a file)
/// are skipped or escalated like load failures.
///
/// # Arguments
///
/// * `config` - Run configuration
/// * `progress` - Called with `(current, total, message)`
///
/// # Returns
///
/// The merged package bytes and statistics about the operation.
///
/// # Errors
///
/// Returns an error if any merge step fails.
pub async fn merge_files<F>(config: &Config, progress: F) -> Result<MergeOutput>
where
    F: FnMut(usize, usize, &str),
{
    if config.inputs.is_empty() {
        return Err(DocMergeError::NoDocuments);
    }

    let mut documents = Vec::with_capacity(config.inputs.len());
    let mut unreadable = Vec::new();
    for path in &config.inputs {
        match DocumentInfo::from_path(path) {
            Ok(info) => documents.push(info),
            Err(e) if !config.options.stop_on_error && e.is_recoverable() => {
                log::warn!("Skipping {}: {}", path.display(), e);
                unreadable.push(SkippedDocument {
                    name: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    if documents.is_empty() {
        return Err(DocMergeError::NothingMerged {
            attempted: config.inputs.len(),
        });
    }

    let mut output = Merger::new()
        .with_reader(DocxReader::new().with_max_file_size(config.limits.max_file_size))
        .with_jobs(config.effective_jobs())
        .merge(&documents, &config.options, progress)
        .await?;
    output.stats.skipped.extend(unreadable);
    Ok(output)
}
