//! Configuration module for docmerge.
//!
//! This module holds the merge options that drive the merge engine and the
//! complete run configuration the CLI derives from its arguments. It handles:
//! - Merge options with defaults, loadable from JSON
//! - Input limits
//! - Validation of argument combinations

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::DocMergeError;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// One mebibyte.
const MIB: u64 = 1024 * 1024;

/// How documents are appended to the master document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Splice elements one by one with full control over breaks and blanks.
    #[default]
    Manual,
    /// Hand whole documents to a composer with a break type.
    Composer,
}

impl FromStr for StrategyKind {
    type Err = crate::DocMergeError;
    /// Parse a strategy name.
    ///
    /// # Arguments
    ///
    /// * `s` - "manual" or "composer"
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't name a strategy.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "composer" => Ok(Self::Composer),
            _ => Err(DocMergeError::InvalidConfig {
                message: format!("Invalid strategy: {s}. Must be one of: manual, composer"),
            }),
        }
    }
}

/// Title page settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverPage {
    /// Title, bold and centered.
    pub title: String,
    /// Subtitle; defaults to a generation timestamp.
    pub subtitle: Option<String>,
    /// Extra centered line below the subtitle.
    pub info: Option<String>,
}

impl CoverPage {
    /// Create a cover page with a title and the default subtitle.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            info: None,
        }
    }
}

/// Options recognized by the merge engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Insert a page break between documents when the master has content.
    pub add_page_break: bool,
    /// Insert a horizontal rule between documents.
    pub add_separator: bool,
    /// Prefix each document with "Document N: name".
    pub number_documents: bool,
    /// Prepend a title page.
    pub cover_page: Option<CoverPage>,
    /// Append a listing of the merged document names.
    pub add_table_of_contents: bool,
    /// Abort on the first document that fails to load.
    pub stop_on_error: bool,
    /// Append strategy.
    pub strategy: StrategyKind,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            add_page_break: true,
            add_separator: false,
            number_documents: false,
            cover_page: None,
            add_table_of_contents: false,
            stop_on_error: false,
            strategy: StrategyKind::default(),
        }
    }
}

impl MergeOptions {
    /// Options with every insertion turned off.
    pub fn plain() -> Self {
        Self {
            add_page_break: false,
            ..Self::default()
        }
    }

    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid merge options JSON")
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In options file: {}", path.display()))
    }

    /// The join-point settings shared by every strategy.
    pub fn splice_policy(&self) -> SplicePolicy {
        SplicePolicy {
            page_break: self.add_page_break,
            separator: self.add_separator,
            numbering: self.number_documents,
        }
    }
}

/// What to insert at each join point between documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplicePolicy {
    /// Page break before a document when the master has content
    pub page_break: bool,
    /// Horizontal rule before a document
    pub separator: bool,
    /// Numbered header before a document
    pub numbering: bool,
}

/// Input limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest accepted input file in bytes.
    pub max_file_size: u64,
    /// Largest number of documents in one merge.
    pub max_documents: usize,
    /// Largest combined input size in bytes.
    pub max_total_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * MIB,
            max_documents: 50,
            max_total_size: 500 * MIB,
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
///
/// This structure contains all settings needed to perform a merge,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input document paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output document path.
    pub output: PathBuf,

    /// Dry run mode - validate and analyze without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print statistics as JSON.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Merge engine options.
    pub options: MergeOptions,

    /// Input limits.
    pub limits: Limits,

    /// Number of documents loaded concurrently (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Config {
    /// Create a configuration with defaults for everything but the paths.
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            inputs,
            output,
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            overwrite_mode: OverwriteMode::default(),
            options: MergeOptions::default(),
            limits: Limits::default(),
            jobs: None,
        }
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output is also an input or is not a `.docx` file
    /// - A cover page has an empty title
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        let is_docx = self
            .output
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
        if !is_docx {
            bail!(
                "Output file must have a .docx extension: {}",
                self.output.display()
            );
        }

        if let Some(cover) = &self.options.cover_page
            && cover.title.trim().is_empty()
        {
            bail!("Cover page title cannot be empty");
        }

        Ok(())
    }

    /// Get the effective number of concurrent loads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
