//! Input document descriptors and their lazy analysis.

use crate::error::{DocMergeError, Result};
use crate::model::Document;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paragraphs assumed to fit on one page when estimating page counts.
pub const PARAGRAPHS_PER_PAGE: usize = 50;

/// Where a document's bytes come from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A file on disk
    Path(PathBuf),
    /// An in-memory buffer
    Memory(Arc<[u8]>),
}

/// Counts gathered by [`DocumentInfo::analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Body paragraphs, blank ones included
    pub paragraphs: usize,
    /// Top-level tables
    pub tables: usize,
    /// Runs holding an embedded picture
    pub images: usize,
    /// Rough page count, see [`estimate_pages`]
    pub pages_estimate: usize,
}

impl Analysis {
    /// Compute the counts for a parsed document.
    pub fn of(doc: &Document) -> Self {
        let paragraphs = doc.paragraph_count();
        let images = doc
            .paragraphs()
            .flat_map(|p| p.runs())
            .filter(|run| run.image_count() > 0)
            .count();
        Self {
            paragraphs,
            tables: doc.table_count(),
            images,
            pages_estimate: estimate_pages(paragraphs),
        }
    }
}

/// Estimate the page count from the paragraph count.
///
/// This is an estimate for display only: `max(1, paragraphs / 50)`.
pub fn estimate_pages(paragraphs: usize) -> usize {
    (paragraphs / PARAGRAPHS_PER_PAGE).max(1)
}

/// Descriptor of one merge input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Display name
    pub name: String,
    #[serde(skip)]
    source: DocumentSource,
    /// Size in bytes
    pub size: u64,
    analysis: Option<Analysis>,
    is_valid: bool,
    error_message: Option<String>,
    #[serde(skip)]
    analyzed: bool,
}

impl DocumentInfo {
    /// Describe a file on disk. The name is the file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DocMergeError::file_not_found(path.to_path_buf())
            } else {
                DocMergeError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        if !metadata.is_file() {
            return Err(DocMergeError::not_a_file(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(
            name,
            DocumentSource::Path(path.to_path_buf()),
            metadata.len(),
        ))
    }

    /// Describe an in-memory document.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let size = bytes.len() as u64;
        Self::new(name.into(), DocumentSource::Memory(bytes), size)
    }

    fn new(name: String, source: DocumentSource, size: u64) -> Self {
        Self {
            name,
            source,
            size,
            analysis: None,
            is_valid: true,
            error_message: None,
            analyzed: false,
        }
    }

    /// Where the bytes come from.
    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Path of the document, when it lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            DocumentSource::Path(path) => Some(path),
            DocumentSource::Memory(_) => None,
        }
    }

    /// Read the raw package bytes.
    pub fn read_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match &self.source {
            DocumentSource::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| DocMergeError::failed_to_load(&self.name, e.to_string())),
            DocumentSource::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }

    /// Read and parse the document.
    pub fn open(&self) -> Result<Document> {
        let bytes = self.read_bytes()?;
        Document::from_bytes(&bytes).map_err(|e| e.with_document_name(&self.name))
    }

    /// Open the document and record its counts.
    ///
    /// Only the first call does any work. A document that fails to open is
    /// marked invalid and the error message is kept; no error is returned.
    pub fn analyze(&mut self) {
        if self.analyzed {
            return;
        }
        self.analyzed = true;

        match self.open() {
            Ok(doc) => {
                self.analysis = Some(Analysis::of(&doc));
                self.is_valid = true;
            }
            Err(e) => {
                log::error!("Error analyzing {}: {}", self.name, e);
                self.is_valid = false;
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Counts from [`analyze`](Self::analyze), if it succeeded.
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// False once analysis has failed.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Why analysis failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True after [`analyze`](Self::analyze) has run.
    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }
}
