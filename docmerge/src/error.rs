//! Error types for docmerge.
//!
//! This module defines all error types that can occur while loading,
//! splicing, and writing Word documents. Errors carry the identity of the
//! offending document so a skipped or escalated failure can be reported
//! precisely.
//!
//! # Error Categories
//!
//! - **Load Errors**: file not found, not a valid `.docx` package
//! - **Input Errors**: no documents, limits exceeded, invalid configuration
//! - **Splice Errors**: unexpected internal state while building the master
//! - **Output Errors**: output exists, cannot be created or written

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for docmerge operations.
pub type Result<T> = std::result::Result<T, DocMergeError>;

/// Main error type for docmerge operations.
#[derive(Debug, Error)]
pub enum DocMergeError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Failed to load a document.
    #[error("Failed to load document: {name}\n  Reason: {reason}")]
    FailedToLoad {
        /// Display name of the document.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// The document could be read but is not a valid `.docx` package.
    #[error("Invalid or corrupted document: {name}\n  Details: {details}")]
    InvalidPackage {
        /// Display name of the document.
        name: String,
        /// Details about what is wrong with the package.
        details: String,
    },

    /// An input file exceeds the per-file size limit.
    #[error(
        "File is too large: {name} ({size} bytes)\n  \
         Hint: the limit is {limit} bytes per document"
    )]
    FileTooLarge {
        /// Display name of the document.
        name: String,
        /// Size of the file in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// More documents were given than the configured maximum.
    #[error("Too many documents: {count} (maximum is {limit})")]
    TooManyDocuments {
        /// Number of documents given.
        count: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// The combined size of all inputs exceeds the configured maximum.
    #[error("Combined input size of {total} bytes exceeds the limit of {limit} bytes")]
    TotalSizeExceeded {
        /// Combined input size in bytes.
        total: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// No documents were provided for merging.
    #[error("No documents specified for merging")]
    NoDocuments,

    /// Every document failed to load, nothing could be merged.
    #[error("None of the {attempted} document(s) could be loaded")]
    NothingMerged {
        /// Number of documents that were attempted.
        attempted: usize,
    },

    /// Splicing elements into the master document failed.
    #[error("Failed to splice document: {reason}")]
    Splice {
        /// Description of what went wrong.
        reason: String,
    },

    /// Serializing the master document failed.
    #[error("Failed to serialize document: {reason}")]
    Serialize {
        /// Description of what went wrong.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<zip::result::ZipError> for DocMergeError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::serialize(format!("zip: {err}"))
    }
}

impl From<quick_xml::Error> for DocMergeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::serialize(format!("xml: {err}"))
    }
}

impl From<anyhow::Error> for DocMergeError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<glob::PatternError> for DocMergeError {
    fn from(err: glob::PatternError) -> Self {
        Self::invalid_config(format!("Invalid glob pattern: {err}"))
    }
}

impl From<glob::GlobError> for DocMergeError {
    fn from(err: glob::GlobError) -> Self {
        Self::other(err.to_string())
    }
}

impl DocMergeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoad error.
    pub fn failed_to_load(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoad {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidPackage error.
    pub fn invalid_package(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidPackage {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create a Splice error.
    pub fn splice(reason: impl Into<String>) -> Self {
        Self::Splice {
            reason: reason.into(),
        }
    }

    /// Create a Serialize error.
    pub fn serialize(reason: impl Into<String>) -> Self {
        Self::Serialize {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Attach a document name to a load-stage error that lacks one.
    ///
    /// Package parsing happens before the caller knows which descriptor the
    /// bytes belong to; this fills in the name afterwards.
    pub fn with_document_name(self, name: &str) -> Self {
        match self {
            Self::InvalidPackage { name: n, details } if n.is_empty() => Self::InvalidPackage {
                name: name.to_string(),
                details,
            },
            Self::FailedToLoad { name: n, reason } if n.is_empty() => Self::FailedToLoad {
                name: name.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// Name or path of the document this error is about, if any.
    pub fn subject(&self) -> Option<String> {
        match self {
            Self::FailedToLoad { name, .. }
            | Self::InvalidPackage { name, .. }
            | Self::FileTooLarge { name, .. }
                if !name.is_empty() =>
            {
                Some(name.clone())
            }
            Self::FileNotFound { path }
            | Self::FileNotAccessible { path, .. }
            | Self::NotAFile { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            _ => None,
        }
    }

    /// Check if this error is recoverable (the merge can skip the document).
    ///
    /// Only per-document load failures are recoverable. Splice and
    /// serialization failures indicate a defect and are always propagated.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileNotAccessible { .. }
                | Self::NotAFile { .. }
                | Self::FailedToLoad { .. }
                | Self::InvalidPackage { .. }
                | Self::FileTooLarge { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoDocuments
                | Self::NothingMerged { .. }
                | Self::Splice { .. }
                | Self::Serialize { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::FailedToLoad { .. } => 3,
            Self::InvalidPackage { .. } => 3,
            Self::FileTooLarge { .. } => 1,
            Self::TooManyDocuments { .. } => 1,
            Self::TotalSizeExceeded { .. } => 1,
            Self::NoDocuments => 1,
            Self::NothingMerged { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::Splice { .. } => 6,
            Self::Serialize { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Other { .. } => 1,
        }
    }
}
