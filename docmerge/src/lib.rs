//! docmerge - Combine Word documents into a single document.
//!
//! This library concatenates `.docx` documents in a fixed order. It supports:
//!
//! - Page breaks between documents without stray blank pages
//! - Optional numbered document headers and separator lines
//! - Optional cover page and table of contents
//! - Skipping unreadable documents or failing fast
//! - Concurrent, order-preserving loading
//! - Per-document analysis for dry runs
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use docmerge::config::Config;
//! use docmerge::io::DocxWriter;
//! use docmerge::merge;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new(
//!     vec![PathBuf::from("a.docx"), PathBuf::from("b.docx")],
//!     PathBuf::from("merged.docx"),
//! );
//! config.options.add_table_of_contents = true;
//!
//! let output = merge::merge_files(&config, |_, _, _| {}).await?;
//! DocxWriter::new().save(output.bytes, &config.output).await?;
//! println!("Merged {} documents", output.stats.total_docs);
//! # Ok(())
//! # }
//! ```
//!
//! ## Working With Parsed Documents
//!
//! ```
//! use docmerge::config::MergeOptions;
//! use docmerge::io::LoadedDocument;
//! use docmerge::merge::Merger;
//! use docmerge::model::Document;
//!
//! let mut hello = Document::new();
//! hello.add_paragraph("Hello");
//! let mut world = Document::new();
//! world.add_paragraph("World");
//!
//! let output = Merger::new()
//!     .merge_loaded(
//!         vec![
//!             Ok(LoadedDocument::new("hello.docx", hello)),
//!             Ok(LoadedDocument::new("world.docx", world)),
//!         ],
//!         &MergeOptions::default(),
//!         |_, _, _| {},
//!     )
//!     .unwrap();
//! assert_eq!(output.stats.total_docs, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod inspect;
pub mod io;
pub mod merge;
pub mod model;
pub mod output;
pub mod package;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, MergeOptions};
pub use error::{DocMergeError, Result};
pub use model::Document;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
