//! Core merge implementation.
//!
//! This module implements the orchestrator that loads the inputs, appends
//! them to a master document one by one in input order, runs the cover page
//! and table of contents passes, and serializes the result.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::analysis::{content_paragraph_count, has_real_content};
use crate::config::MergeOptions;
use crate::error::{DocMergeError, Result};
use crate::inspect::DocumentInfo;
use crate::io::{DocxReader, LoadResult};
use crate::merge::passes::{add_cover_page, add_table_of_contents};
use crate::merge::strategy::{AppendContext, MergeStrategy, strategy_for};
use crate::model::Document;
use crate::utils::format_file_size;

/// A document that was not merged, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    /// Display name.
    pub name: String,
    /// Reason it was skipped.
    pub reason: String,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeStats {
    /// Number of documents appended to the output.
    pub total_docs: usize,

    /// Non-blank paragraphs copied from the sources.
    pub total_paragraphs: usize,

    /// Tables copied from the sources.
    pub total_tables: usize,

    /// Embedded images copied from the sources.
    pub total_images: usize,

    /// Wall time of the whole merge.
    #[serde(serialize_with = "serialize_seconds")]
    pub processing_time: Duration,

    /// Combined size of the loaded inputs.
    pub input_size: u64,

    /// Size of the produced package.
    pub output_size: u64,

    /// Names of the appended documents, in order.
    pub merged: Vec<String>,

    /// Documents that were skipped.
    pub skipped: Vec<SkippedDocument>,
}

fn serialize_seconds<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl MergeStats {
    /// Processing time in seconds.
    pub fn processing_seconds(&self) -> f64 {
        self.processing_time.as_secs_f64()
    }

    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }

    fn record_skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedDocument {
            name: name.into(),
            reason: reason.into(),
        });
    }
}

/// Result of a merge operation.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// The serialized `.docx` package.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub stats: MergeStats,
}

/// Cooperative cancellation flag, checked between documents.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Document merger that combines multiple documents.
#[derive(Debug, Clone)]
pub struct Merger {
    /// Reader for loading documents.
    reader: DocxReader,

    /// Number of documents loaded concurrently.
    jobs: usize,

    /// Cancellation flag.
    cancel: CancelFlag,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self {
            reader: DocxReader::new(),
            jobs: 1,
            cancel: CancelFlag::new(),
        }
    }

    /// Use a specific reader.
    pub fn with_reader(mut self, reader: DocxReader) -> Self {
        self.reader = reader;
        self
    }

    /// Load up to `jobs` documents concurrently.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Share a cancellation flag with the caller.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for cancelling merges run by this merger.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Merge documents according to options.
    ///
    /// This is the main entry point for merging operations. Sources are
    /// prefetched concurrently, then appended strictly in input order.
    ///
    /// # Arguments
    ///
    /// * `documents` - Inputs in merge order
    /// * `options` - Merge options
    /// * `progress` - Called with `(current, total, message)` as work completes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No documents are given
    /// - A document fails to load and `stop_on_error` is set
    /// - No document could be loaded at all
    /// - Splicing or serialization fails
    /// - The merge was cancelled
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use docmerge::inspect::DocumentInfo;
    /// # use docmerge::config::MergeOptions;
    /// # use docmerge::merge::Merger;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let inputs = vec![
    ///     DocumentInfo::from_path("a.docx")?,
    ///     DocumentInfo::from_path("b.docx")?,
    /// ];
    /// let output = Merger::new()
    ///     .merge(&inputs, &MergeOptions::default(), |i, n, msg| println!("{i}/{n} {msg}"))
    ///     .await?;
    /// println!("Merged {} documents", output.stats.total_docs);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge<F>(
        &self,
        documents: &[DocumentInfo],
        options: &MergeOptions,
        mut progress: F,
    ) -> Result<MergeOutput>
    where
        F: FnMut(usize, usize, &str),
    {
        if documents.is_empty() {
            return Err(DocMergeError::NoDocuments);
        }

        progress(0, documents.len(), "Loading documents");
        let (results, load_stats) = self.reader.load_all(documents, self.jobs).await;
        log::info!(
            "Loaded {} of {} document(s) in {:?}",
            load_stats.success_count,
            documents.len(),
            load_stats.total_time
        );

        self.merge_loaded(results, options, progress)
    }

    /// Merge already loaded documents.
    ///
    /// Failed loads in `inputs` are skipped or escalated according to
    /// `stop_on_error`. The output is only produced when the whole run
    /// succeeds.
    pub fn merge_loaded<F>(
        &self,
        inputs: Vec<LoadResult>,
        options: &MergeOptions,
        mut progress: F,
    ) -> Result<MergeOutput>
    where
        F: FnMut(usize, usize, &str),
    {
        let start = Instant::now();
        let total = inputs.len();
        if total == 0 {
            return Err(DocMergeError::NoDocuments);
        }

        let strategy = strategy_for(options);
        log::debug!("Using {} strategy", strategy.name());

        let mut stats = MergeStats::default();
        let mut names = Vec::with_capacity(total);
        let mut master: Option<Document> = None;

        for (position, input) in inputs.into_iter().enumerate() {
            self.check_cancelled()?;
            let index = position + 1;

            let loaded = match input {
                Ok(loaded) => loaded,
                Err(e) => {
                    let name = e.subject().unwrap_or_else(|| format!("document {index}"));
                    if options.stop_on_error || !e.is_recoverable() {
                        log::error!("Error processing {}: {}", name, e);
                        return Err(e);
                    }
                    log::warn!("Skipping {}: {}", name, e);
                    stats.record_skip(name.clone(), e.to_string());
                    names.push(name);
                    progress(index, total, "Skipped unreadable document");
                    continue;
                }
            };

            names.push(loaded.name.clone());
            stats.input_size += loaded.file_size;

            let master = master.get_or_insert_with(|| loaded.document.shell());
            let appended = append_document(
                strategy.as_ref(),
                master,
                &loaded.document,
                AppendContext {
                    index,
                    name: &loaded.name,
                },
                &mut stats,
            )?;

            if appended {
                log::info!("Appended {} ({}/{})", loaded.name, index, total);
                progress(index, total, &format!("Processed {}", loaded.name));
            } else {
                log::warn!("Skipping {}: no content", loaded.name);
                stats.record_skip(loaded.name.clone(), "document has no content");
                progress(index, total, &format!("Skipped {}", loaded.name));
            }
        }

        self.check_cancelled()?;
        let mut master = master.ok_or(DocMergeError::NothingMerged { attempted: total })?;

        if let Some(cover) = &options.cover_page {
            add_cover_page(&mut master, cover);
        }
        if options.add_table_of_contents {
            add_table_of_contents(&mut master, &names);
        }

        progress(total, total, "Saving merged document");
        let bytes = master.to_bytes()?;

        stats.output_size = bytes.len() as u64;
        stats.processing_time = start.elapsed();
        log::info!(
            "Merged {} document(s), {} skipped, in {:.2}s",
            stats.total_docs,
            stats.skipped.len(),
            stats.processing_seconds()
        );

        Ok(MergeOutput { bytes, stats })
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            log::warn!("Merge cancelled");
            return Err(DocMergeError::Cancelled);
        }
        Ok(())
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

/// Append one source to the master and account for it.
///
/// Returns false, without touching the master, when the source has no real
/// content.
pub fn append_document(
    strategy: &dyn MergeStrategy,
    master: &mut Document,
    source: &Document,
    ctx: AppendContext<'_>,
    stats: &mut MergeStats,
) -> Result<bool> {
    if !has_real_content(source) {
        return Ok(false);
    }

    strategy.append(master, source, ctx)?;

    stats.total_docs += 1;
    stats.total_paragraphs += content_paragraph_count(source);
    stats.total_tables += source.table_count();
    stats.total_images += source.image_count();
    stats.merged.push(ctx.name.to_string());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoverPage, StrategyKind};
    use crate::io::LoadedDocument;
    use crate::model::Element;

    fn loaded(name: &str, texts: &[&str]) -> LoadResult {
        let mut doc = Document::new();
        for text in texts {
            doc.add_paragraph(*text);
        }
        Ok(LoadedDocument::new(name, doc))
    }

    fn merged_texts(output: &MergeOutput) -> Vec<String> {
        Document::from_bytes(&output.bytes)
            .unwrap()
            .elements
            .iter()
            .map(Element::plain_text)
            .collect()
    }

    #[test]
    fn test_hello_world_scenario() {
        let output = Merger::new()
            .merge_loaded(
                vec![loaded("a", &["Hello", ""]), loaded("b", &["World"])],
                &MergeOptions::default(),
                |_, _, _| {},
            )
            .unwrap();

        assert_eq!(merged_texts(&output), vec!["Hello", "", "World"]);
        assert_eq!(output.stats.total_docs, 2);
        assert_eq!(output.stats.total_paragraphs, 2);
        assert_eq!(output.stats.total_tables, 0);
        assert_eq!(output.stats.merged, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let err = Merger::new()
            .merge_loaded(vec![], &MergeOptions::default(), |_, _, _| {})
            .unwrap_err();
        assert!(matches!(err, DocMergeError::NoDocuments));
    }

    #[test]
    fn test_empty_document_is_skipped() {
        let output = Merger::new()
            .merge_loaded(
                vec![loaded("empty", &[]), loaded("full", &["Text"])],
                &MergeOptions::default(),
                |_, _, _| {},
            )
            .unwrap();

        assert_eq!(merged_texts(&output), vec!["Text"]);
        assert_eq!(output.stats.total_docs, 1);
        assert_eq!(output.stats.skipped.len(), 1);
        assert_eq!(output.stats.skipped[0].name, "empty");
    }

    #[test]
    fn test_content_control_only_document_is_skipped() {
        use crate::model::{Element, OpaqueBlock, RawXml};

        let mut cover = Document::new();
        cover.push(Element::Opaque(OpaqueBlock {
            raw: RawXml::new(
                "<w:sdt><w:sdtContent><w:p><w:r><w:t>Cover title</w:t></w:r></w:p></w:sdtContent></w:sdt>",
            ),
            text: "Cover title".into(),
        }));

        let strategy = strategy_for(&MergeOptions::default());
        let mut master = cover.shell();
        let mut stats = MergeStats::default();
        let appended = append_document(
            strategy.as_ref(),
            &mut master,
            &cover,
            AppendContext {
                index: 1,
                name: "cover.docx",
            },
            &mut stats,
        )
        .unwrap();

        assert!(!appended);
        assert!(master.is_empty());
        assert_eq!(stats.total_docs, 0);
        assert!(stats.merged.is_empty());
    }

    #[test]
    fn test_failed_load_skipped_or_escalated() {
        let inputs = || {
            vec![
                loaded("a", &["A"]),
                Err(DocMergeError::invalid_package("bad.docx", "not a zip")),
                loaded("c", &["C"]),
            ]
        };

        let output = Merger::new()
            .merge_loaded(inputs(), &MergeOptions::default(), |_, _, _| {})
            .unwrap();
        assert_eq!(output.stats.total_docs, 2);
        assert_eq!(output.stats.skipped[0].name, "bad.docx");

        let options = MergeOptions {
            stop_on_error: true,
            ..MergeOptions::default()
        };
        let err = Merger::new()
            .merge_loaded(inputs(), &options, |_, _, _| {})
            .unwrap_err();
        assert_eq!(err.subject().as_deref(), Some("bad.docx"));
    }

    #[test]
    fn test_fatal_load_error_is_never_skipped() {
        let err = Merger::new()
            .merge_loaded(
                vec![loaded("a", &["A"]), Err(DocMergeError::serialize("boom"))],
                &MergeOptions::default(),
                |_, _, _| {},
            )
            .unwrap_err();
        assert!(matches!(err, DocMergeError::Serialize { .. }));
    }

    #[test]
    fn test_all_failed_is_nothing_merged() {
        let err = Merger::new()
            .merge_loaded(
                vec![Err(DocMergeError::failed_to_load("x", "gone"))],
                &MergeOptions::default(),
                |_, _, _| {},
            )
            .unwrap_err();
        assert!(matches!(err, DocMergeError::NothingMerged { attempted: 1 }));
    }

    #[test]
    fn test_cancelled_merge_returns_error() {
        let merger = Merger::new();
        merger.cancel_flag().cancel();
        let err = merger
            .merge_loaded(
                vec![loaded("a", &["A"])],
                &MergeOptions::default(),
                |_, _, _| {},
            )
            .unwrap_err();
        assert!(matches!(err, DocMergeError::Cancelled));
    }

    #[test]
    fn test_progress_reports_each_document() {
        let mut calls = Vec::new();
        Merger::new()
            .merge_loaded(
                vec![loaded("a", &["A"]), loaded("b", &["B"])],
                &MergeOptions::default(),
                |current, total, _| calls.push((current, total)),
            )
            .unwrap();
        assert_eq!(calls, vec![(1, 2), (2, 2), (2, 2)]);
    }

    #[test]
    fn test_cover_and_toc_wrap_body() {
        let options = MergeOptions {
            cover_page: Some(CoverPage {
                title: "Bundle".into(),
                subtitle: Some("Q3".into()),
                info: None,
            }),
            add_table_of_contents: true,
            strategy: StrategyKind::Composer,
            ..MergeOptions::default()
        };
        let output = Merger::new()
            .merge_loaded(
                vec![loaded("a", &["A"]), loaded("b", &["B"])],
                &options,
                |_, _, _| {},
            )
            .unwrap();

        let texts = merged_texts(&output);
        assert_eq!(&texts[..4], &["Bundle", "Q3", "", "A"]);
        assert_eq!(texts[4], "B");
        assert_eq!(
            &texts[texts.len() - 4..],
            &["Table of Contents", "1. a", "2. b", ""]
        );
    }

    #[test]
    fn test_merge_stats_serialize_seconds() {
        let stats = MergeStats {
            processing_time: Duration::from_millis(1500),
            ..MergeStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["processing_time"], 1.5);
        assert_eq!(json["total_docs"], 0);
    }

    #[tokio::test]
    async fn test_merge_from_memory_sources() {
        let bytes = |text: &str| {
            let mut doc = Document::new();
            doc.add_paragraph(text);
            doc.to_bytes().unwrap()
        };
        let inputs = vec![
            DocumentInfo::from_bytes("one.docx", bytes("One")),
            DocumentInfo::from_bytes("two.docx", bytes("Two")),
        ];

        let output = Merger::new()
            .with_jobs(2)
            .merge(&inputs, &MergeOptions::plain(), |_, _, _| {})
            .await
            .unwrap();
        assert_eq!(merged_texts(&output), vec!["One", "Two"]);
        assert_eq!(output.stats.merged, vec!["one.docx", "two.docx"]);
    }

    #[tokio::test]
    async fn test_merge_no_documents() {
        let result = Merger::new()
            .merge(&[], &MergeOptions::default(), |_, _, _| {})
            .await;
        assert!(matches!(result, Err(DocMergeError::NoDocuments)));
    }
}
