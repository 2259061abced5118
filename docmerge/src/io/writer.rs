//! Writing merged packages to disk.
//!
//! Writes are atomic by default: the package goes to a sibling temporary
//! file which is then renamed over the destination, so a failed write never
//! leaves a truncated `.docx` behind.
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::io::writer::DocxWriter;
//! use docmerge::model::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = DocxWriter::new();
//! writer.save_document(&doc, Path::new("output.docx")).await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{DocMergeError, Result};
use crate::model::Document;
use crate::utils::format_file_size;

/// Options for writing packages.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write to a temporary file, then rename.
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Package writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    options: WriteOptions,
}

impl DocxWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that writes straight to the destination.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Serialize a document and write it to `path`.
    pub async fn save_document(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let doc = doc.clone();
        let bytes = task::spawn_blocking(move || doc.to_bytes())
            .await
            .map_err(|e| DocMergeError::other(format!("Serialize task failed: {e}")))??;
        self.save_with_stats(bytes, path).await
    }

    /// Write already serialized package bytes to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    pub async fn save(&self, bytes: Vec<u8>, path: &Path) -> Result<()> {
        let _stats = self.save_with_stats(bytes, path).await?;
        Ok(())
    }

    /// Write package bytes and return statistics about the operation.
    pub async fn save_with_stats(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                temp_path_for(&path_buf)
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| {
                DocMergeError::FailedToCreateOutput {
                    path: write_path.clone(),
                    source: e,
                }
            })?;

            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
            writer
                .write_all(&bytes)
                .and_then(|()| writer.flush())
                .map_err(|e| DocMergeError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                })?;
            drop(writer);

            if options.atomic
                && let Err(e) = std::fs::rename(&write_path, &path_buf)
            {
                let _ = std::fs::remove_file(&write_path);
                return Err(DocMergeError::FailedToWrite {
                    path: path_buf,
                    source: e,
                });
            }

            log::debug!("Wrote {} bytes to {}", bytes.len(), path_buf.display());

            Ok::<_, DocMergeError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| DocMergeError::other(format!("Write task failed: {e}")))??;

        Ok(stats)
    }

    /// Check that a file could be written to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or read-only.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                return Err(DocMergeError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }

            let metadata =
                tokio::fs::metadata(parent)
                    .await
                    .map_err(|e| DocMergeError::FileNotAccessible {
                        path: parent.to_path_buf(),
                        source: e,
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

    /// True if something already exists at `path`.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    /// Remove an output file if it exists.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<()> {
        if self.exists(path).await {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| DocMergeError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
