//! Document-level types.

use super::paragraph::Paragraph;
use super::table::Table;
use super::{RawXml, W_NS};
use crate::error::Result;
use crate::package::{self, Package};

/// Body-level element the model does not interpret (content controls,
/// body-level bookmarks, custom XML).
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueBlock {
    /// Verbatim element
    pub raw: RawXml,
    /// Concatenated descendant `w:t` text
    pub text: String,
}

/// One block-level element of the body, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// Anything else, kept verbatim
    Opaque(OpaqueBlock),
}

impl Element {
    /// The paragraph, if this element is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// True for tables.
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    /// Visible text of the element.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Paragraph(p) => p.plain_text(),
            Self::Table(t) => t
                .rows
                .iter()
                .flat_map(|row| row.iter())
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
            Self::Opaque(o) => o.text.clone(),
        }
    }

    /// Number of embedded images.
    pub fn image_count(&self) -> usize {
        match self {
            Self::Paragraph(p) => p.image_count(),
            Self::Table(t) => t.image_count(),
            Self::Opaque(o) => o.raw.image_count(),
        }
    }
}

impl From<Paragraph> for Element {
    fn from(p: Paragraph) -> Self {
        Self::Paragraph(p)
    }
}

impl From<Table> for Element {
    fn from(t: Table) -> Self {
        Self::Table(t)
    }
}

/// The document root element (`w:document`) with its namespace declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RootTag {
    /// Qualified element name
    pub name: String,
    /// Namespace declarations as (prefix, uri); `None` is the default namespace
    pub namespaces: Vec<(Option<String>, String)>,
    /// Other attributes as (qualified name, value)
    pub attributes: Vec<(String, String)>,
}

impl RootTag {
    /// Root tag for a new document.
    pub fn wordprocessing() -> Self {
        let ns = [
            ("w", W_NS),
            (
                "r",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
            ),
            (
                "wp",
                "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing",
            ),
            ("a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
            (
                "pic",
                "http://schemas.openxmlformats.org/drawingml/2006/picture",
            ),
        ];
        Self {
            name: "w:document".to_string(),
            namespaces: ns
                .iter()
                .map(|(p, u)| (Some(p.to_string()), u.to_string()))
                .collect(),
            attributes: Vec::new(),
        }
    }

    /// True when `prefix` is declared.
    pub fn declares(&self, prefix: Option<&str>) -> bool {
        self.namespaces.iter().any(|(p, _)| p.as_deref() == prefix)
    }

    /// Take over namespace declarations from another root that this one lacks,
    /// and union the `Ignorable` prefix lists.
    ///
    /// Fragments copied from `other` keep their prefixes, so those prefixes must
    /// be declared on the receiving root.
    pub fn adopt(&mut self, other: &RootTag) {
        for (prefix, uri) in &other.namespaces {
            if !self.declares(prefix.as_deref()) {
                self.namespaces.push((prefix.clone(), uri.clone()));
            }
        }

        for (name, value) in &other.attributes {
            if !name.ends_with("Ignorable") {
                continue;
            }
            match self.attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => {
                    let mut tokens: Vec<String> =
                        existing.split_whitespace().map(str::to_string).collect();
                    for token in value.split_whitespace() {
                        if !tokens.iter().any(|t| t == token) {
                            tokens.push(token.to_string());
                        }
                    }
                    *existing = tokens.join(" ");
                }
                None => self.attributes.push((name.clone(), value.clone())),
            }
        }
    }
}

/// A loaded Word document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root element and namespaces
    pub root: RootTag,
    /// Body content in order, excluding the final section properties
    pub elements: Vec<Element>,
    /// Final body-level `w:sectPr`
    pub section: Option<RawXml>,
    /// Every other part of the package
    pub package: Package,
}

/// US Letter with one-inch margins.
const DEFAULT_SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

impl Document {
    /// Create a blank document.
    pub fn new() -> Self {
        Self {
            root: RootTag::wordprocessing(),
            elements: Vec::new(),
            section: Some(RawXml::new(DEFAULT_SECTION)),
            package: Package::minimal(),
        }
    }

    /// Parse a `.docx` package.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        package::read_document(bytes)
    }

    /// Serialize to a `.docx` package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        package::write_document(self)
    }

    /// Same package, root and section settings with an empty body.
    pub fn shell(&self) -> Self {
        Self {
            root: self.root.clone(),
            elements: Vec::new(),
            section: self.section.clone(),
            package: self.package.clone(),
        }
    }

    /// Append an element.
    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    /// Append a paragraph holding one plain text run.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.push(Paragraph::with_text(text));
    }

    /// Append a paragraph holding a hard page break.
    pub fn add_page_break(&mut self) {
        self.push(Paragraph::page_break());
    }

    /// All paragraphs of the body, including blank ones.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.elements.iter().filter_map(Element::as_paragraph)
    }

    /// All top-level tables of the body.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(|e| match e {
            Element::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Number of top-level tables.
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// Number of embedded images anywhere in the body.
    pub fn image_count(&self) -> usize {
        self.elements.iter().map(Element::image_count).sum()
    }

    /// The last body element.
    pub fn last_element(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// True when the body has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Body text, one line per element.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(Element::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
