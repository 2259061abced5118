//! Table type.

use super::RawXml;

/// A table (`w:tbl`).
///
/// Tables are copied verbatim; the cell text is extracted only so callers can
/// inspect content without re-parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Cell text by row
    pub rows: Vec<Vec<String>>,
    /// Verbatim element
    pub raw: RawXml,
}

impl Table {
    /// Number of embedded images inside the table.
    pub fn image_count(&self) -> usize {
        self.raw.image_count()
    }
}
