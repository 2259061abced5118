//! Integration tests for basic document merging.

use docmerge::config::{Config, CoverPage, MergeOptions, StrategyKind};
use docmerge::io::DocxWriter;
use docmerge::merge::{TOC_HEADING, merge_files};
use docmerge::model::Element;

use crate::common::{
    body_texts, content_texts, document, page_breaks, reopen, table, temp_output_path,
    write_docx, write_text_docx,
};

fn config_for(dir: &std::path::Path, inputs: Vec<std::path::PathBuf>) -> Config {
    let mut config = Config::new(inputs, dir.join("merged.docx"));
    config.quiet = true;
    config
}

#[tokio::test]
async fn test_hello_world() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["Hello", ""]);
    let b = write_text_docx(dir.path(), "b.docx", &["World"]);

    let config = config_for(dir.path(), vec![a, b]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["Hello", "", "World"]);
    assert!(merged.elements[1].as_paragraph().unwrap().has_page_break());
    assert_eq!(page_breaks(&merged), 1);

    assert_eq!(output.stats.total_docs, 2);
    assert_eq!(output.stats.total_paragraphs, 2);
    assert_eq!(output.stats.total_tables, 0);
    assert!(output.stats.skipped.is_empty());
}

#[tokio::test]
async fn test_merge_writes_readable_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["First"]);
    let b = write_text_docx(dir.path(), "b.docx", &["Second"]);

    let (_out_dir, output_path) = temp_output_path();
    let config = config_for(dir.path(), vec![a, b]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let stats = DocxWriter::new()
        .save_with_stats(output.bytes, &output_path)
        .await
        .unwrap();
    assert!(output_path.exists());
    assert!(stats.file_size > 0);

    let merged = reopen(&std::fs::read(&output_path).unwrap());
    assert_eq!(content_texts(&merged), vec!["First", "Second"]);
}

#[tokio::test]
async fn test_single_document_has_no_breaks() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["One", "Two", "Three"]);

    let config = config_for(dir.path(), vec![a]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["One", "Two", "Three"]);
    assert_eq!(page_breaks(&merged), 0);
    assert_eq!(output.stats.total_docs, 1);
}

#[tokio::test]
async fn test_n_documents_give_n_minus_one_breaks() {
    let dir = tempfile::TempDir::new().unwrap();
    let inputs: Vec<_> = ["a", "b", "c", "d"]
        .iter()
        .map(|name| write_text_docx(dir.path(), &format!("{name}.docx"), &[name, ""]))
        .collect();

    let config = config_for(dir.path(), inputs);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(page_breaks(&merged), 3);
    assert_eq!(content_texts(&merged), vec!["a", "b", "c", "d"]);
    assert!(
        !merged
            .elements
            .last()
            .and_then(Element::as_paragraph)
            .is_some_and(|p| p.has_page_break()),
        "output must not end in a page break"
    );
}

#[tokio::test]
async fn test_contentless_document_adds_no_break() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let blank = write_text_docx(dir.path(), "blank.docx", &["", "  "]);
    let c = write_text_docx(dir.path(), "c.docx", &["C"]);

    let config = config_for(dir.path(), vec![a, blank, c]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["A", "", "C"]);
    assert_eq!(page_breaks(&merged), 1);
    assert_eq!(output.stats.total_docs, 2);
    assert_eq!(output.stats.skipped.len(), 1);
    assert_eq!(output.stats.skipped[0].name, "blank.docx");
}

#[tokio::test]
async fn test_empty_document_then_content() {
    let dir = tempfile::TempDir::new().unwrap();
    let empty = write_text_docx(dir.path(), "empty.docx", &[]);
    let full = write_text_docx(dir.path(), "full.docx", &["Alpha", "Beta"]);

    let config = config_for(dir.path(), vec![empty, full]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["Alpha", "Beta"]);
    assert_eq!(page_breaks(&merged), 0);
    assert_eq!(output.stats.total_docs, 1);
    assert_eq!(output.stats.merged, vec!["full.docx"]);
    assert_eq!(output.stats.skipped.len(), 1);
}

#[tokio::test]
async fn test_table_of_contents_lists_inputs() {
    let dir = tempfile::TempDir::new().unwrap();
    let inputs: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| write_text_docx(dir.path(), &format!("{name}.docx"), &[name]))
        .collect();

    let mut config = config_for(dir.path(), inputs);
    config.options.add_table_of_contents = true;
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    let texts = body_texts(&merged);
    let tail = &texts[texts.len() - 5..];
    assert_eq!(
        tail,
        &[
            TOC_HEADING.to_string(),
            "1. a.docx".into(),
            "2. b.docx".into(),
            "3. c.docx".into(),
            String::new(),
        ]
    );
    assert!(merged.elements.last().unwrap().as_paragraph().unwrap().has_page_break());
}

#[tokio::test]
async fn test_round_trip_prefix_is_stable() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["Intro", "", "Body", ""]);
    let b = write_text_docx(dir.path(), "b.docx", &["Appendix"]);

    let single = merge_files(&config_for(dir.path(), vec![a.clone()]), |_, _, _| {})
        .await
        .unwrap();
    let pair = merge_files(&config_for(dir.path(), vec![a, b]), |_, _, _| {})
        .await
        .unwrap();

    let single_texts = body_texts(&reopen(&single.bytes));
    let pair_texts = body_texts(&reopen(&pair.bytes));

    assert_eq!(single_texts, vec!["Intro", "Body"]);
    assert_eq!(&pair_texts[..single_texts.len()], single_texts.as_slice());
    assert_eq!(&pair_texts[single_texts.len()..], &["", "Appendix"]);
}

#[tokio::test]
async fn test_numbered_documents_with_separator() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let b = write_text_docx(dir.path(), "b.docx", &["B"]);

    let mut config = config_for(dir.path(), vec![a, b]);
    config.options.number_documents = true;
    config.options.add_separator = true;
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    let rule: String = "\u{2500}".repeat(80);
    assert_eq!(
        body_texts(&merged),
        vec![
            "Document 1: a.docx".to_string(),
            rule.clone(),
            "A".into(),
            String::new(),
            "Document 2: b.docx".into(),
            rule,
            "B".into(),
        ]
    );

    let header = merged.paragraphs().next().unwrap().runs().next().unwrap();
    assert!(header.properties.bold);
    assert_eq!(header.properties.size_pt, Some(14.0));
}

#[tokio::test]
async fn test_composer_strategy() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["Hello", ""]);
    let b = write_text_docx(dir.path(), "b.docx", &["World"]);

    let mut config = config_for(dir.path(), vec![a, b]);
    config.options.strategy = StrategyKind::Composer;
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["Hello", "World"]);
    assert_eq!(page_breaks(&merged), 1);
    assert!(merged.elements[1].as_paragraph().unwrap().has_page_break());
    assert_eq!(output.stats.total_paragraphs, 2);
}

#[tokio::test]
async fn test_tables_are_carried_and_counted() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut with_table = document(&["Before"]);
    with_table.push(table("Cell"));
    let a = write_docx(dir.path(), "a.docx", &with_table);
    let only_table = {
        let mut doc = document(&[]);
        doc.push(table("Alone"));
        write_docx(dir.path(), "b.docx", &doc)
    };

    let config = config_for(dir.path(), vec![a, only_table]);
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(merged.table_count(), 2);
    assert_eq!(body_texts(&merged), vec!["Before", "Cell", "", "Alone"]);
    assert_eq!(output.stats.total_tables, 2);
    assert_eq!(output.stats.total_paragraphs, 1);
}

#[tokio::test]
async fn test_cover_page_precedes_body() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["Body"]);

    let mut config = config_for(dir.path(), vec![a]);
    config.options.cover_page = Some(CoverPage {
        title: "Quarterly Report".into(),
        subtitle: Some("Q3".into()),
        info: None,
    });
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["Quarterly Report", "Q3", "", "Body"]);
    assert_eq!(page_breaks(&merged), 1);
}

#[tokio::test]
async fn test_progress_reaches_total() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A"]);
    let b = write_text_docx(dir.path(), "b.docx", &["B"]);

    let mut reports = Vec::new();
    let config = config_for(dir.path(), vec![a, b]);
    merge_files(&config, |current, total, message| {
        reports.push((current, total, message.to_string()));
    })
    .await
    .unwrap();

    assert_eq!(reports.first().map(|r| (r.0, r.1)), Some((0, 2)));
    assert_eq!(reports.last().map(|r| (r.0, r.1)), Some((2, 2)));
    assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
}

#[tokio::test]
async fn test_plain_options_merge_back_to_back() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_text_docx(dir.path(), "a.docx", &["A", ""]);
    let b = write_text_docx(dir.path(), "b.docx", &["", "B"]);

    let mut config = config_for(dir.path(), vec![a, b]);
    config.options = MergeOptions::plain();
    let output = merge_files(&config, |_, _, _| {}).await.unwrap();

    let merged = reopen(&output.bytes);
    assert_eq!(body_texts(&merged), vec!["A", "B"]);
}
