//! Paragraph-level types.

use super::RawXml;
use super::run::Run;

/// Paragraph justification (`w:jc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Left / start
    Left,
    /// Centered
    Center,
    /// Right / end
    Right,
    /// Justified
    Justify,
}

impl Alignment {
    /// Parse a `w:jc/@w:val` value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "justify" | "distribute" => Some(Self::Justify),
            _ => None,
        }
    }

    /// The `w:jc/@w:val` value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

/// Paragraph formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Paragraph style id (`w:pStyle`)
    pub style: Option<String>,
    /// Justification (`w:jc`)
    pub alignment: Option<Alignment>,
    /// The paragraph ends a section (`w:pPr/w:sectPr`)
    pub section_break: bool,
    /// Original `w:pPr` element when the paragraph came from a parsed document
    pub raw: Option<RawXml>,
}

/// Inline child of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A run
    Run(Run),
    /// Anything else (hyperlinks, fields, bookmarks, tracked changes), kept verbatim
    Opaque(OpaqueInline),
}

/// An inline element the model does not interpret.
///
/// The text and break flags are extracted at parse time so classification
/// sees through hyperlinks and similar wrappers.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueInline {
    /// Verbatim element
    pub raw: RawXml,
    /// Concatenated descendant `w:t` text
    pub text: String,
    /// A descendant `w:br w:type="page"` exists
    pub page_break: bool,
}

/// A paragraph (`w:p`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Paragraph formatting
    pub properties: ParagraphProperties,
    /// Inline content in document order
    pub content: Vec<Inline>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with one plain text run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(Run::text(text));
        p
    }

    /// Create a paragraph whose only content is a hard page break.
    pub fn page_break() -> Self {
        let mut p = Self::new();
        p.add_run(Run::page_break());
        p
    }

    /// Set the alignment.
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.properties.alignment = Some(alignment);
        self
    }

    /// Append a run.
    pub fn add_run(&mut self, run: Run) {
        self.content.push(Inline::Run(run));
    }

    /// Insert a run before all existing content.
    pub fn prepend_run(&mut self, run: Run) {
        self.content.insert(0, Inline::Run(run));
    }

    /// Direct runs of the paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|c| match c {
            Inline::Run(run) => Some(run),
            Inline::Opaque(_) => None,
        })
    }

    /// Visible text including text nested in opaque inlines.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                Inline::Run(run) => run.plain_text(),
                Inline::Opaque(o) => o.text.clone(),
            })
            .collect()
    }

    /// True when the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    /// True when any run contains a hard page break.
    pub fn has_page_break(&self) -> bool {
        self.content.iter().any(|c| match c {
            Inline::Run(run) => run.has_page_break(),
            Inline::Opaque(o) => o.page_break,
        })
    }

    /// True when any run embeds a drawing.
    pub fn has_drawing(&self) -> bool {
        self.runs().any(Run::has_drawing) || self.image_count() > 0
    }

    /// Number of embedded images.
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .map(|c| match c {
                Inline::Run(run) => run.image_count(),
                Inline::Opaque(o) => o.raw.image_count(),
            })
            .sum()
    }

    /// True when the paragraph carries a section break.
    pub fn has_section_break(&self) -> bool {
        self.properties.section_break
    }
}
