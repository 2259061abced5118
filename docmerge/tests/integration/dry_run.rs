//! Integration tests for dry runs, analysis and input collection.

use docmerge::config::{Config, MergeOptions, StrategyKind};
use docmerge::inspect::DocumentInfo;
use docmerge::output::describe_analysis;
use docmerge::utils::list_docx_in_folder;
use docmerge::validation::Validator;

use crate::common::{document, table, write_docx, write_text_docx};

#[tokio::test]
async fn test_dry_run_does_not_create_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let output = dir.path().join("merged.docx");

    let mut config = Config::new(vec![a], output.clone());
    config.dry_run = true;

    let summary = Validator::new().validate_config(&config).await.unwrap();
    assert_eq!(summary.files_validated, 1);
    assert!(!output.exists(), "Output file should not be created in dry run");
}

#[tokio::test]
async fn test_dry_run_skips_output_checks() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);

    let mut config = Config::new(vec![a], dir.path().join("missing/dir/out.docx"));
    config.dry_run = true;
    assert!(Validator::new().validate_config(&config).await.is_ok());

    config.dry_run = false;
    assert!(Validator::new().validate_config(&config).await.is_err());
}

#[test]
fn test_analysis_counts() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut doc = document(&["One", "", "Three"]);
    doc.push(table("Cell"));
    let path = write_docx(dir.path(), "report.docx", &doc);

    let mut info = DocumentInfo::from_path(&path).unwrap();
    assert!(!info.is_analyzed());
    info.analyze();

    let analysis = info.analysis().copied().unwrap();
    assert_eq!(analysis.paragraphs, 3);
    assert_eq!(analysis.tables, 1);
    assert_eq!(analysis.images, 0);
    assert_eq!(analysis.pages_estimate, 1);
    assert_eq!(
        describe_analysis(&info),
        "report.docx: 3 paragraphs, 1 tables, 0 images, ~1 page(s)"
    );
}

#[test]
fn test_page_estimate_for_long_document() {
    let dir = tempfile::TempDir::new().unwrap();
    let texts: Vec<String> = (0..120).map(|i| format!("Line {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let path = write_text_docx(dir.path(), "long.docx", &refs);

    let mut info = DocumentInfo::from_path(&path).unwrap();
    info.analyze();
    assert_eq!(info.analysis().unwrap().pages_estimate, 2);
}

#[test]
fn test_analysis_failure_stays_on_descriptor() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.docx");
    std::fs::write(&path, b"garbage").unwrap();

    let mut info = DocumentInfo::from_path(&path).unwrap();
    info.analyze();
    assert!(info.is_analyzed());
    assert!(!info.is_valid());
    assert!(info.error_message().is_some());
    assert!(info.analysis().is_none());

    // A second call does not retry.
    std::fs::write(&path, document(&["fixed"]).to_bytes().unwrap()).unwrap();
    info.analyze();
    assert!(!info.is_valid());
}

#[test]
fn test_analysis_serializes_camel_case() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_docx(dir.path(), "a.docx", &["A"]);

    let mut info = DocumentInfo::from_path(&path).unwrap();
    info.analyze();
    let json = serde_json::to_value(&info).unwrap();

    assert_eq!(json["name"], "a.docx");
    assert_eq!(json["isValid"], true);
    assert_eq!(json["analysis"]["pagesEstimate"], 1);
}

#[test]
fn test_folder_scan_feeds_merge_order() {
    let dir = tempfile::TempDir::new().unwrap();
    write_text_docx(dir.path(), "02-body.docx", &["Body"]);
    write_text_docx(dir.path(), "01-intro.docx", &["Intro"]);
    write_text_docx(dir.path(), "~$01-intro.docx", &["lock"]);
    std::fs::write(dir.path().join("readme.txt"), b"ignore").unwrap();

    let files = list_docx_in_folder(dir.path(), false).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["01-intro.docx", "02-body.docx"]);
}

#[test]
fn test_options_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(
        &path,
        r#"{
            "add_separator": true,
            "strategy": "composer",
            "cover_page": { "title": "Handbook" }
        }"#,
    )
    .unwrap();

    let options = MergeOptions::from_json_file(&path).unwrap();
    assert!(options.add_page_break);
    assert!(options.add_separator);
    assert_eq!(options.strategy, StrategyKind::Composer);
    assert_eq!(options.cover_page.unwrap().title, "Handbook");
}
