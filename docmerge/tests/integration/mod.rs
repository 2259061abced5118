//! Integration tests for docmerge.
//!
//! Documents are built in memory, written as real `.docx` packages into a
//! temporary directory and merged end to end.

use docmerge::model::{Document, Element, RawXml, Table};
use std::path::{Path, PathBuf};

/// One paragraph per entry; `""` gives a blank paragraph.
pub fn document(texts: &[&str]) -> Document {
    let mut doc = Document::new();
    for text in texts {
        doc.add_paragraph(*text);
    }
    doc
}

/// A one-cell table holding `text`.
pub fn table(text: &str) -> Table {
    Table {
        rows: vec![vec![text.to_string()]],
        raw: RawXml::new(format!(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"
        )),
    }
}

/// Serialize `doc` to `dir/name` and return the path.
pub fn write_docx(dir: &Path, name: &str, doc: &Document) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, doc.to_bytes().expect("serialize test document"))
        .expect("write test document");
    path
}

/// Write a document of plain paragraphs.
pub fn write_text_docx(dir: &Path, name: &str, texts: &[&str]) -> PathBuf {
    write_docx(dir, name, &document(texts))
}

/// Parse a merged package back into a document.
pub fn reopen(bytes: &[u8]) -> Document {
    Document::from_bytes(bytes).expect("merged output is a valid package")
}

/// Text of every body element, in order.
pub fn body_texts(doc: &Document) -> Vec<String> {
    doc.elements.iter().map(Element::plain_text).collect()
}

/// Paragraphs carrying an explicit page break.
pub fn page_breaks(doc: &Document) -> usize {
    doc.paragraphs().filter(|p| p.has_page_break()).count()
}

/// Body texts with page-break paragraphs and blanks removed.
pub fn content_texts(doc: &Document) -> Vec<String> {
    doc.elements
        .iter()
        .filter(|e| !e.plain_text().trim().is_empty())
        .map(Element::plain_text)
        .collect()
}

/// A path in a fresh temporary directory that does not exist yet.
pub fn temp_output_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("merged.docx");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_helper() {
        let doc = document(&["a", "", "b"]);
        assert_eq!(body_texts(&doc), vec!["a", "", "b"]);
        assert_eq!(content_texts(&doc), vec!["a", "b"]);
    }

    #[test]
    fn test_written_docx_reopens() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut doc = document(&["x"]);
        doc.push(table("cell"));
        let path = write_docx(dir.path(), "t.docx", &doc);

        let reread = reopen(&std::fs::read(path).unwrap());
        assert_eq!(reread.table_count(), 1);
        assert_eq!(body_texts(&reread)[0], "x");
    }

    #[test]
    fn test_temp_output_path_is_fresh() {
        let (_dir, path) = temp_output_path();
        assert!(!path.exists());
    }
}
