//! I/O operations for docmerge.
//!
//! This module handles all file I/O:
//! - Loading `.docx` packages from disk or memory
//! - Concurrent, order-preserving loading
//! - Writing merged packages to disk
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::io::{DocxReader, DocxWriter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocxReader::new();
//! let loaded = reader.load(Path::new("input.docx")).await?;
//!
//! let writer = DocxWriter::new();
//! writer.save_document(&loaded.document, Path::new("output.docx")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{DocxReader, LoadResult, LoadStatistics, LoadedDocument};
pub use writer::{DocxWriter, WriteOptions, WriteStatistics};

use crate::error::Result;
use crate::model::Document;
use std::path::Path;

/// Load a single document from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid package.
pub async fn load_document(path: &Path) -> Result<Document> {
    let loaded = DocxReader::new().load(path).await?;
    Ok(loaded.document)
}

/// Serialize a document and save it to a file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn save_document(doc: &Document, path: &Path) -> Result<()> {
    DocxWriter::new().save_document(doc, path).await?;
    Ok(())
}
