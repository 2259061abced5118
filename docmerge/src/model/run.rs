//! Run-level types: a contiguous span of uniformly formatted content.

use super::RawXml;

/// Kind of a `w:br` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Plain line break (`w:br` without type, or `w:cr`)
    Line,
    /// Hard page break (`w:type="page"`)
    Page,
    /// Column break (`w:type="column"`)
    Column,
}

/// One child of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    /// Literal text (`w:t`)
    Text(String),
    /// Tab character (`w:tab`)
    Tab,
    /// Explicit break (`w:br`, `w:cr`)
    Break(BreakKind),
    /// Embedded drawing, picture or object, kept verbatim
    Drawing(RawXml),
    /// Any other run child (field codes, symbols, rendered-break hints)
    Raw(RawXml),
}

/// Formatting of a run.
///
/// The flags are parsed from `w:rPr` so the blank-page analysis can look at
/// them; `raw` keeps the original element so nothing is lost on write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// Bold (`w:b`)
    pub bold: bool,
    /// Italic (`w:i`)
    pub italic: bool,
    /// Any underline other than `none` (`w:u`)
    pub underline: bool,
    /// Font size in points (`w:sz` holds half-points)
    pub size_pt: Option<f32>,
    /// Hex RGB color such as `808080`
    pub color: Option<String>,
    /// Original `w:rPr` element when the run came from a parsed document
    pub raw: Option<RawXml>,
}

impl RunProperties {
    /// True when bold, italic or underline is set.
    pub fn has_emphasis(&self) -> bool {
        self.bold || self.italic || self.underline
    }
}

/// A run of content (`w:r`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// Run formatting
    pub properties: RunProperties,
    /// Run children in document order
    pub content: Vec<RunContent>,
}

impl Run {
    /// Create an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a run holding a single piece of text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            properties: RunProperties::default(),
            content: vec![RunContent::Text(text.into())],
        }
    }

    /// Create a run holding a hard page break.
    pub fn page_break() -> Self {
        Self {
            properties: RunProperties::default(),
            content: vec![RunContent::Break(BreakKind::Page)],
        }
    }

    /// Set bold.
    pub fn bold(mut self, bold: bool) -> Self {
        self.properties.bold = bold;
        self
    }

    /// Set italic.
    pub fn italic(mut self, italic: bool) -> Self {
        self.properties.italic = italic;
        self
    }

    /// Set the font size in points.
    pub fn size(mut self, points: f32) -> Self {
        self.properties.size_pt = Some(points);
        self
    }

    /// Set the font color as a hex RGB string.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.properties.color = Some(color.into());
        self
    }

    /// Visible text of the run. Tabs and line breaks render as whitespace.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(text) => out.push_str(text),
                RunContent::Tab => out.push('\t'),
                RunContent::Break(BreakKind::Line) => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// True when the run contains a hard page break.
    pub fn has_page_break(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, RunContent::Break(BreakKind::Page)))
    }

    /// True when the run embeds a drawing or picture.
    pub fn has_drawing(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, RunContent::Drawing(_)))
    }

    /// Number of embedded images referenced by the run.
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .map(|c| match c {
                RunContent::Drawing(raw) => raw.image_count(),
                _ => 0,
            })
            .sum()
    }

    /// True when the run has no visible text.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}
