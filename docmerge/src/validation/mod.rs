//! Input validation for docmerge.
//!
//! Checks run before any merge work starts:
//! - File existence and type
//! - `.docx` extension and Word lock files
//! - Per-file, total size and document count limits
//! - The file opens as a package with a main document part
//! - Output path validation
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::validation::Validator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new();
//! let result = validator.validate_file(Path::new("report.docx")).await?;
//! println!("{} paragraphs", result.paragraphs);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{Config, Limits, OverwriteMode};
use crate::error::{DocMergeError, Result};
use crate::inspect::Analysis;
use crate::model::Document;
use crate::utils::{LOCK_FILE_PREFIX, format_file_size};

/// Result of validating a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Number of body paragraphs.
    pub paragraphs: usize,

    /// Number of body tables.
    pub tables: usize,

    /// Number of runs carrying images.
    pub images: usize,
}

impl ValidationResult {
    fn from_document(path: PathBuf, file_size: u64, doc: &Document) -> Self {
        let analysis = Analysis::of(doc);
        Self {
            path,
            file_size,
            paragraphs: analysis.paragraphs,
            tables: analysis.tables,
            images: analysis.images,
        }
    }
}

/// Summary of validation results for multiple files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Individual validation results for each file.
    pub results: Vec<ValidationResult>,

    /// Total number of paragraphs across all files.
    pub total_paragraphs: usize,

    /// Total file size in bytes.
    pub total_size: u64,

    /// Number of files that passed validation.
    pub files_validated: usize,

    /// Number of files that failed validation.
    pub files_failed: usize,
}

impl ValidationSummary {
    /// Create a summary from validation results.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let total_paragraphs = results.iter().map(|r| r.paragraphs).sum();
        let total_size = results.iter().map(|r| r.file_size).sum();
        let files_validated = results.len();

        Self {
            results,
            total_paragraphs,
            total_size,
            files_validated,
            files_failed: 0,
        }
    }

    /// Format the total file size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Validator for input documents and configuration.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: Limits,
}

impl Validator {
    /// Create a validator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator enforcing `limits`.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Validate a single document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a regular file
    /// - Name lacks the `.docx` extension or is a Word lock file
    /// - File is empty or larger than the per-file limit
    /// - File is not a readable package
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationResult> {
        if !path.exists() {
            return Err(DocMergeError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(DocMergeError::not_a_file(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if name.starts_with(LOCK_FILE_PREFIX) {
            return Err(DocMergeError::invalid_package(
                &name,
                "Word lock file, not a document",
            ));
        }

        let is_docx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
        if !is_docx {
            return Err(DocMergeError::invalid_package(
                &name,
                "Expected a .docx file",
            ));
        }

        let metadata =
            tokio::fs::metadata(path)
                .await
                .map_err(|e| DocMergeError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                })?;

        let size = metadata.len();
        if size == 0 {
            return Err(DocMergeError::invalid_package(&name, "File is empty"));
        }
        if size > self.limits.max_file_size {
            return Err(DocMergeError::FileTooLarge {
                name,
                size,
                limit: self.limits.max_file_size,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DocMergeError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;
        let doc = tokio::task::spawn_blocking(move || Document::from_bytes(&bytes))
            .await
            .map_err(|e| DocMergeError::failed_to_load(&name, format!("Task failed: {e}")))?
            .map_err(|e| e.with_document_name(&name))?;

        Ok(ValidationResult::from_document(
            path.to_path_buf(),
            size,
            &doc,
        ))
    }

    /// Validate multiple documents.
    ///
    /// With `continue_on_error` failing files are counted and skipped,
    /// otherwise the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if a file fails and `continue_on_error` is false, or
    /// if no file passes.
    pub async fn validate_files(
        &self,
        paths: &[PathBuf],
        continue_on_error: bool,
    ) -> Result<ValidationSummary> {
        let mut results = Vec::new();
        let mut failed_count = 0;

        for path in paths {
            match self.validate_file(path).await {
                Ok(result) => results.push(result),
                Err(e) if continue_on_error && e.is_recoverable() => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    failed_count += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if results.is_empty() {
            return Err(DocMergeError::NothingMerged {
                attempted: paths.len(),
            });
        }

        let mut summary = ValidationSummary::from_results(results);
        summary.files_failed = failed_count;

        Ok(summary)
    }

    /// Check the document count and combined size limits.
    ///
    /// Missing files are ignored here; [`validate_file`](Self::validate_file)
    /// reports them.
    pub fn validate_documents(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Err(DocMergeError::NoDocuments);
        }

        if paths.len() > self.limits.max_documents {
            return Err(DocMergeError::TooManyDocuments {
                count: paths.len(),
                limit: self.limits.max_documents,
            });
        }

        let total: u64 = paths
            .iter()
            .filter_map(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();
        if total > self.limits.max_total_size {
            return Err(DocMergeError::TotalSizeExceeded {
                total,
                limit: self.limits.max_total_size,
            });
        }

        Ok(())
    }

    /// Validate the output path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output file exists and no-clobber is set
    /// - Output directory doesn't exist or is not writable
    pub async fn validate_output(&self, config: &Config) -> Result<()> {
        let output_path = &config.output;

        if output_path.exists() && config.overwrite_mode == OverwriteMode::NoClobber {
            return Err(DocMergeError::output_exists(output_path.clone()));
        }

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                return Err(DocMergeError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }

            let metadata = tokio::fs::metadata(parent).await.map_err(|e| {
                DocMergeError::FileNotAccessible {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;

            if metadata.permissions().readonly() {
                return Err(DocMergeError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Validate the complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation check fails.
    pub async fn validate_config(&self, config: &Config) -> Result<ValidationSummary> {
        self.validate_documents(&config.inputs)?;

        let summary = self
            .validate_files(&config.inputs, !config.options.stop_on_error)
            .await?;

        if !config.dry_run {
            self.validate_output(config).await?;
        }

        Ok(summary)
    }
}
