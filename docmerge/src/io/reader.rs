//! Document reading and loading operations.
//!
//! This module provides document loading with support for:
//! - Sequential and concurrent loading
//! - Order-preserving prefetch
//! - Per-file size limits
//! - Detailed load statistics
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::inspect::DocumentInfo;
//! use docmerge::io::reader::DocxReader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocxReader::new();
//! let inputs = vec![DocumentInfo::from_path("a.docx")?, DocumentInfo::from_path("b.docx")?];
//! let (results, stats) = reader.load_all(&inputs, 4).await;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{DocMergeError, Result};
use crate::inspect::DocumentInfo;
use crate::model::Document;
use crate::utils::format_file_size;

/// A loaded document with metadata.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Display name.
    pub name: String,

    /// The parsed document.
    pub document: Document,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// Size of the package in bytes.
    pub file_size: u64,
}

impl LoadedDocument {
    /// Wrap an already parsed document.
    pub fn new(name: impl Into<String>, document: Document) -> Self {
        Self {
            name: name.into(),
            document,
            load_time: Duration::ZERO,
            file_size: 0,
        }
    }
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedDocument>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of documents successfully loaded.
    pub success_count: usize,

    /// Number of documents that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Average time per successful load.
    pub average_time: Duration,

    /// Total size of successfully loaded files.
    pub total_size: u64,

    /// Total number of paragraphs loaded.
    pub total_paragraphs: usize,
}

impl LoadStatistics {
    /// Create statistics from load results.
    pub fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut total_size = 0;
        let mut total_paragraphs = 0;
        let mut total_load_time = Duration::ZERO;

        for result in results {
            match result {
                Ok(loaded) => {
                    success_count += 1;
                    total_size += loaded.file_size;
                    total_paragraphs += loaded.document.paragraph_count();
                    total_load_time += loaded.load_time;
                }
                Err(_) => {
                    failure_count += 1;
                }
            }
        }

        let average_time = if success_count > 0 {
            total_load_time / success_count as u32
        } else {
            Duration::ZERO
        };

        Self {
            success_count,
            failure_count,
            total_time,
            average_time,
            total_size,
            total_paragraphs,
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Document reader with configurable loading behavior.
#[derive(Debug, Clone, Default)]
pub struct DocxReader {
    /// Reject packages larger than this many bytes.
    max_file_size: Option<u64>,
}

impl DocxReader {
    /// Create a new reader without a size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject documents larger than `limit` bytes.
    pub fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = Some(limit);
        self
    }

    /// Load a single document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or cannot be read
    /// - File exceeds the size limit
    /// - File is not a valid `.docx` package
    pub async fn load(&self, path: &Path) -> Result<LoadedDocument> {
        let info = DocumentInfo::from_path(path)?;
        self.load_source(&info).await
    }

    /// Load a document from an in-memory buffer.
    pub async fn load_bytes(&self, name: &str, bytes: Vec<u8>) -> Result<LoadedDocument> {
        let info = DocumentInfo::from_bytes(name, bytes);
        self.load_source(&info).await
    }

    /// Load the document a descriptor points to.
    ///
    /// Parsing runs on the blocking thread pool.
    pub async fn load_source(&self, info: &DocumentInfo) -> Result<LoadedDocument> {
        if let Some(limit) = self.max_file_size
            && info.size > limit
        {
            return Err(DocMergeError::FileTooLarge {
                name: info.name.clone(),
                size: info.size,
                limit,
            });
        }

        let start = Instant::now();
        let owned = info.clone();
        let document = tokio::task::spawn_blocking(move || owned.open())
            .await
            .map_err(|e| DocMergeError::failed_to_load(&info.name, format!("Task failed: {e}")))??;
        let load_time = start.elapsed();

        log::debug!(
            "Loaded {} ({}, {} paragraphs) in {:?}",
            info.name,
            format_file_size(info.size),
            document.paragraph_count(),
            load_time
        );

        Ok(LoadedDocument {
            name: info.name.clone(),
            document,
            load_time,
            file_size: info.size,
        })
    }

    /// Load documents one at a time in the order provided.
    pub async fn load_sequential(&self, infos: &[DocumentInfo]) -> Vec<LoadResult> {
        let mut results = Vec::with_capacity(infos.len());

        for info in infos {
            let result = self.load_source(info).await;
            results.push(result);
        }

        results
    }

    /// Load documents concurrently.
    ///
    /// At most `workers` documents are in flight at once. Results come back
    /// in the same order as the inputs.
    pub async fn load_parallel(&self, infos: &[DocumentInfo], workers: usize) -> Vec<LoadResult> {
        use futures::stream::{self, StreamExt};

        let workers = workers.max(1);

        let tasks = infos.iter().map(|info| {
            let reader = self.clone();
            async move { reader.load_source(info).await }
        });

        stream::iter(tasks)
            .buffered(workers)
            .collect::<Vec<_>>()
            .await
    }

    /// Load all documents with automatic parallelization.
    ///
    /// Sequential loading is used for small batches to reduce overhead.
    ///
    /// # Returns
    ///
    /// A tuple of (results, statistics) where results holds the outcome for
    /// each input in input order.
    pub async fn load_all(
        &self,
        infos: &[DocumentInfo],
        max_workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        let results = if infos.len() <= 3 || max_workers <= 1 {
            self.load_sequential(infos).await
        } else {
            self.load_parallel(infos, max_workers).await
        };

        let total_time = start.elapsed();
        let stats = LoadStatistics::from_results(&results, total_time);

        (results, stats)
    }
}
