//! In-memory model of a WordprocessingML document body.
//!
//! The model keeps the parts the merge logic reasons about (paragraphs, runs,
//! breaks, tables) as typed values and everything else as verbatim XML, so a
//! document survives a load/save cycle without losing content the merger does
//! not understand.

mod document;
mod paragraph;
mod run;
mod table;

pub use document::{Document, Element, OpaqueBlock, RootTag};
pub use paragraph::{Alignment, Inline, OpaqueInline, Paragraph, ParagraphProperties};
pub use run::{BreakKind, Run, RunContent, RunProperties};
pub use table::Table;

use std::fmt;

/// WordprocessingML main namespace.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Verbatim XML fragment copied from a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawXml(String);

impl RawXml {
    /// Wrap an XML fragment.
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    /// The fragment as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of embedded pictures (`a:blip`, `v:imagedata`) in the fragment.
    pub fn image_count(&self) -> usize {
        count_elements(&self.0, "blip") + count_elements(&self.0, "imagedata")
    }
}

impl fmt::Display for RawXml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Count start tags with the given local name, with or without a prefix.
fn count_elements(xml: &str, local: &str) -> usize {
    xml.match_indices(local)
        .filter(|(i, _)| {
            let before = xml[..*i].chars().next_back();
            let after = xml[i + local.len()..].chars().next();
            let opens = match before {
                Some('<') => true,
                Some(':') => {
                    // Walk back over the prefix to the '<'
                    let head = &xml[..i - 1];
                    let prefix_start = head
                        .rfind(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-' || c == '.'));
                    prefix_start.is_some_and(|p| head[p..].starts_with('<'))
                }
                _ => false,
            };
            opens && matches!(after, Some(c) if c.is_whitespace() || c == '/' || c == '>')
        })
        .count()
}
