//! `.docx` package handling.
//!
//! A `.docx` file is a zip archive of XML parts. Only the main document part
//! is parsed into the [`Document`] model; every other part (styles,
//! numbering, media, relationships) is carried through unchanged.

mod parse;
mod serialize;

use crate::error::{DocMergeError, Result};
use crate::model::Document;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const PACKAGE_RELS: &str = "_rels/.rels";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

const MINIMAL_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const MINIMAL_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// One file inside the package.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Path inside the archive
    pub name: String,
    /// Raw bytes, shared between clones
    pub data: Arc<[u8]>,
}

/// The zip container of a document, minus the interpreted body.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    parts: Vec<Part>,
    main_part: String,
}

impl Package {
    /// Smallest valid package: content types, package relationships and an
    /// empty main part.
    pub fn minimal() -> Self {
        let part = |name: &str, data: &[u8]| Part {
            name: name.to_string(),
            data: Arc::from(data),
        };
        Self {
            parts: vec![
                part("[Content_Types].xml", MINIMAL_CONTENT_TYPES.as_bytes()),
                part(PACKAGE_RELS, MINIMAL_RELS.as_bytes()),
                part(DEFAULT_MAIN_PART, b""),
            ],
            main_part: DEFAULT_MAIN_PART.to_string(),
        }
    }

    /// Read every part of a zip archive and locate the main document part.
    pub fn from_zip(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocMergeError::invalid_package("", format!("not a zip archive: {e}")))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| DocMergeError::invalid_package("", e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| DocMergeError::invalid_package("", format!("{name}: {e}")))?;
            parts.push(Part {
                name,
                data: Arc::from(data),
            });
        }

        let main_part = locate_main_part(&parts);
        if !parts.iter().any(|p| p.name == main_part) {
            return Err(DocMergeError::invalid_package(
                "",
                format!("missing main document part '{main_part}'"),
            ));
        }

        log::trace!("Package has {} parts, main part {}", parts.len(), main_part);
        Ok(Self { parts, main_part })
    }

    /// Path of the main document part.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// All parts in archive order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Look up a part by path.
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Write the package to a zip archive, substituting `main_xml` for the
    /// main document part.
    pub fn to_zip(&self, main_xml: &[u8]) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;
            if part.name == self.main_part {
                writer.write_all(main_xml)?;
            } else {
                writer.write_all(&part.data)?;
            }
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Resolve the main part through the package relationships, falling back to
/// the conventional path.
fn locate_main_part(parts: &[Part]) -> String {
    let target = parts
        .iter()
        .find(|p| p.name == PACKAGE_RELS)
        .and_then(|rels| std::str::from_utf8(&rels.data).ok())
        .and_then(|xml| {
            let doc = roxmltree::Document::parse(strip_bom(xml)).ok()?;
            doc.descendants()
                .filter(|n| n.has_tag_name("Relationship"))
                .find(|n| {
                    n.attribute("Type")
                        .is_some_and(|t| t.ends_with(OFFICE_DOCUMENT_REL))
                })
                .and_then(|n| n.attribute("Target"))
                .map(|t| t.trim_start_matches('/').to_string())
        });

    target.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string())
}

fn strip_bom(xml: &str) -> &str {
    xml.strip_prefix('\u{feff}').unwrap_or(xml)
}

/// Parse a `.docx` file into a [`Document`].
pub fn read_document(bytes: &[u8]) -> Result<Document> {
    let package = Package::from_zip(bytes)?;
    let main = package
        .part(package.main_part())
        .map(|p| Arc::clone(&p.data))
        .ok_or_else(|| DocMergeError::invalid_package("", "main document part vanished"))?;

    let xml = std::str::from_utf8(&main).map_err(|e| {
        DocMergeError::invalid_package("", format!("main part is not UTF-8: {e}"))
    })?;
    let body = parse::parse_main_part(strip_bom(xml))?;

    Ok(Document {
        root: body.root,
        elements: body.elements,
        section: body.section,
        package,
    })
}

/// Serialize a [`Document`] to `.docx` bytes.
pub fn write_document(doc: &Document) -> Result<Vec<u8>> {
    let main_xml = serialize::write_main_part(doc)?;
    doc.package.to_zip(&main_xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Paragraph, Run};

    #[test]
    fn test_minimal_package_roundtrip() {
        let mut doc = Document::new();
        doc.add_paragraph("Hello");
        doc.push(Paragraph::new().aligned(Alignment::Center));
        let bytes = doc.to_bytes().unwrap();

        let loaded = Document::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.paragraph_count(), 2);
        assert_eq!(loaded.elements[0].plain_text(), "Hello");
        assert_eq!(
            loaded.paragraphs().nth(1).unwrap().properties.alignment,
            Some(Alignment::Center)
        );
        assert!(loaded.section.is_some());
        assert_eq!(loaded.package.main_part(), "word/document.xml");
    }

    #[test]
    fn test_formatting_survives_write() {
        let mut doc = Document::new();
        let mut p = Paragraph::new();
        p.add_run(Run::text("x & <y>").bold(true).size(14.0).color("808080"));
        doc.push(p);

        let loaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        let run = loaded.paragraphs().next().unwrap().runs().next().unwrap();
        assert_eq!(run.plain_text(), "x & <y>");
        assert!(run.properties.bold);
        assert!(!run.properties.italic);
        assert_eq!(run.properties.size_pt, Some(14.0));
        assert_eq!(run.properties.color.as_deref(), Some("808080"));
    }

    #[test]
    fn test_page_break_survives_write() {
        let mut doc = Document::new();
        doc.add_page_break();
        let loaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert!(loaded.paragraphs().next().unwrap().has_page_break());
    }

    #[test]
    fn test_garbage_is_invalid_package() {
        let err = Document::from_bytes(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocMergeError::InvalidPackage { .. }));
    }

    #[test]
    fn test_zip_without_main_part_is_invalid() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("readme.txt", FileOptions::default())
            .unwrap();
        writer.write_all(b"hi").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = Document::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DocMergeError::InvalidPackage { .. }));
    }

    #[test]
    fn test_other_parts_carried_through() {
        let mut doc = Document::new();
        doc.package.parts.push(Part {
            name: "word/media/image1.png".into(),
            data: Arc::from(&b"\x89PNG"[..]),
        });
        let loaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(
            loaded.package.part("word/media/image1.png").map(|p| &*p.data),
            Some(&b"\x89PNG"[..])
        );
    }
}
