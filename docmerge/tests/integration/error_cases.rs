//! Integration tests for error handling and edge cases.

use docmerge::config::{Config, Limits, OverwriteMode};
use docmerge::error::DocMergeError;
use docmerge::merge::merge_files;
use docmerge::validation::Validator;
use std::path::{Path, PathBuf};

use crate::common::{body_texts, reopen, temp_output_path, write_text_docx};

fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not a zip archive").unwrap();
    path
}

fn config_for(dir: &Path, inputs: Vec<PathBuf>) -> Config {
    let mut config = Config::new(inputs, dir.join("merged.docx"));
    config.quiet = true;
    config
}

#[tokio::test]
async fn test_error_empty_input_list() {
    let (_dir, output) = temp_output_path();
    let config = Config::new(vec![], output);

    assert!(config.validate().is_err(), "Should fail with empty input list");

    let result = merge_files(&config, |_, _, _| {}).await;
    assert!(matches!(result, Err(DocMergeError::NoDocuments)));
}

#[tokio::test]
async fn test_nonexistent_input_is_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = write_text_docx(dir.path(), "good.docx", &["Kept"]);
    let missing = dir.path().join("missing.docx");

    let config = config_for(dir.path(), vec![missing.clone(), good]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    assert_eq!(body_texts(&reopen(&output.bytes)), vec!["Kept"]);
    assert_eq!(output.stats.total_docs, 1);
    assert_eq!(output.stats.skipped.len(), 1);
    assert_eq!(output.stats.skipped[0].name, missing.display().to_string());
}

#[tokio::test]
async fn test_nonexistent_input_with_stop_on_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = write_text_docx(dir.path(), "good.docx", &["Kept"]);

    let mut config = config_for(dir.path(), vec![good, dir.path().join("missing.docx")]);
    config.options.stop_on_error = true;

    let err = merge_files(&config, |_, _, _| {}).await.unwrap_err();
    assert!(matches!(err, DocMergeError::FileNotFound { .. }));
    assert_eq!(err.subject().as_deref(), Some("missing.docx"));
}

#[tokio::test]
async fn test_corrupt_document_is_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let broken = write_garbage(dir.path(), "broken.docx");
    let c = write_text_docx(dir.path(), "c.docx", &["C"]);

    let config = config_for(dir.path(), vec![a, broken, c]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    assert_eq!(body_texts(&reopen(&output.bytes)), vec!["A", "", "C"]);
    assert_eq!(output.stats.merged, vec!["a.docx", "c.docx"]);
    assert_eq!(output.stats.skipped[0].name, "broken.docx");
}

#[tokio::test]
async fn test_corrupt_document_with_stop_on_error_names_it() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let broken = write_garbage(dir.path(), "broken.docx");

    let mut config = config_for(dir.path(), vec![a, broken]);
    config.options.stop_on_error = true;

    let err = merge_files(&config, |_, _, _| {}).await.unwrap_err();
    assert!(matches!(err, DocMergeError::InvalidPackage { .. }));
    assert_eq!(err.subject().as_deref(), Some("broken.docx"));
    assert!(err.to_string().contains("broken.docx"));
}

#[tokio::test]
async fn test_all_documents_unreadable() {
    let dir = tempfile::TempDir::new().unwrap();
    let x = write_garbage(dir.path(), "x.docx");
    let y = write_garbage(dir.path(), "y.docx");

    let config = config_for(dir.path(), vec![x, y]);
    let err = merge_files(&config, |_, _, _| {}).await.unwrap_err();
    assert!(matches!(err, DocMergeError::NothingMerged { attempted: 2 }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_all_documents_missing() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_for(
        dir.path(),
        vec![dir.path().join("a.docx"), dir.path().join("b.docx")],
    );

    let err = merge_files(&config, |_, _, _| {}).await.unwrap_err();
    assert!(matches!(err, DocMergeError::NothingMerged { attempted: 2 }));
}

#[tokio::test]
async fn test_file_over_size_limit_is_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let lines: Vec<String> = (0..300)
        .map(|i| format!("Paragraph {i} holds {} distinct words", i * 7919))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let big = write_text_docx(dir.path(), "big.docx", &refs);
    let small = write_text_docx(dir.path(), "small.docx", &["Small"]);
    let limit = std::fs::metadata(&small).unwrap().len();
    assert!(std::fs::metadata(&big).unwrap().len() > limit);

    let mut config = config_for(dir.path(), vec![big, small]);
    config.limits = Limits {
        max_file_size: limit - 1,
        ..Limits::default()
    };
    config.inputs.reverse();

    let err = merge_files(&config, |_, _, _| {}).await.unwrap_err();
    assert!(matches!(err, DocMergeError::NothingMerged { .. }));

    config.limits.max_file_size = limit;
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();
    assert_eq!(output.stats.merged, vec!["small.docx"]);
    assert!(
        output
            .stats
            .skipped
            .iter()
            .any(|s| s.name == "big.docx" && s.reason.contains("too large"))
    );
}

#[tokio::test]
async fn test_output_exists_with_no_clobber() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let output = dir.path().join("merged.docx");
    std::fs::write(&output, b"old").unwrap();

    let mut config = Config::new(vec![a], output);
    config.overwrite_mode = OverwriteMode::NoClobber;

    let err = Validator::new().validate_output(&config).await.unwrap_err();
    assert!(matches!(err, DocMergeError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test]
async fn test_too_many_documents() {
    let dir = tempfile::TempDir::new().unwrap();
    let inputs: Vec<_> = (0..3)
        .map(|i| write_text_docx(dir.path(), &format!("{i}.docx"), &["x"]))
        .collect();

    let mut config = config_for(dir.path(), inputs);
    config.limits.max_documents = 2;

    let err = Validator::with_limits(config.limits)
        .validate_config(&config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocMergeError::TooManyDocuments { count: 3, limit: 2 }
    ));
}

#[test]
fn test_output_among_inputs_is_rejected() {
    let config = Config::new(
        vec![PathBuf::from("a.docx"), PathBuf::from("b.docx")],
        PathBuf::from("a.docx"),
    );
    assert!(config.validate().is_err());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let mut config = Config::new(vec![PathBuf::from("a.docx")], PathBuf::from("o.docx"));
    config.verbose = true;
    config.quiet = true;
    assert!(config.validate().is_err());
}

#[test]
fn test_exit_codes() {
    assert_eq!(DocMergeError::NoDocuments.exit_code(), 1);
    assert_eq!(
        DocMergeError::file_not_found(PathBuf::from("x.docx")).exit_code(),
        2
    );
    assert_eq!(
        DocMergeError::invalid_package("x.docx", "bad").exit_code(),
        3
    );
}
