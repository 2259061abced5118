//! Content classification and blank-paragraph trimming.
//!
//! These are the checks the merger runs at every join point to decide whether
//! a page break is needed and which trailing paragraphs are safe to drop.

use crate::model::{Document, Element, Paragraph};

/// True when an element carries visible content.
///
/// Tables always count, paragraphs count when their text is not
/// whitespace-only. Body-level opaque blocks (content controls, custom XML)
/// never count, whatever text they hold.
pub fn is_content(element: &Element) -> bool {
    match element {
        Element::Table(_) => true,
        Element::Paragraph(p) => !p.is_blank(),
        Element::Opaque(_) => false,
    }
}

/// Check whether a document carries real content.
///
/// Returns false when the body has no paragraphs and no tables, or when every
/// paragraph is whitespace-only and there are no tables.
pub fn has_real_content(doc: &Document) -> bool {
    doc.elements.iter().any(is_content)
}

/// Find the last table or non-blank paragraph, scanning from the end.
pub fn last_meaningful_element(doc: &Document) -> Option<&Element> {
    doc.elements.iter().rev().find(|e| is_content(e))
}

/// Index of the first table or non-blank paragraph.
///
/// # Returns
///
/// The index, or 0 when there is none so that callers keep everything.
pub fn first_content_index(elements: &[Element]) -> usize {
    elements.iter().position(is_content).unwrap_or(0)
}

/// True when the trailing paragraph can be dropped without losing intent.
///
/// A blank paragraph is kept when it holds a hard page break, a run with
/// bold/italic/underline set, a drawing, or a section break.
pub fn is_removable_blank(paragraph: &Paragraph) -> bool {
    if !paragraph.is_blank() {
        return false;
    }
    if paragraph.has_page_break() || paragraph.has_drawing() || paragraph.has_section_break() {
        return false;
    }
    !paragraph.runs().any(|run| run.properties.has_emphasis())
}

/// Remove trailing blank paragraphs until the last element is worth keeping.
///
/// Runs to a fixed point and stops at a trailing table or opaque block.
///
/// # Returns
///
/// Number of paragraphs removed.
pub fn trim_trailing_blanks(doc: &mut Document) -> usize {
    let mut removed = 0;
    while let Some(Element::Paragraph(last)) = doc.elements.last() {
        if !is_removable_blank(last) {
            break;
        }
        doc.elements.pop();
        removed += 1;
    }
    if removed > 0 {
        log::debug!("Trimmed {} trailing blank paragraph(s)", removed);
    }
    removed
}

/// True when the trailing element already starts a new page: a paragraph
/// holding a hard page break or ending a section.
pub fn ends_with_page_break(doc: &Document) -> bool {
    matches!(
        doc.elements.last(),
        Some(Element::Paragraph(p)) if p.has_page_break() || p.has_section_break()
    )
}

/// Select the elements of a source document that get copied into the master.
///
/// Starts at the first content element, then drops whitespace-only paragraphs
/// without a page break or drawing, except the final element which is always
/// kept.
pub fn splice_window(elements: &[Element]) -> Vec<&Element> {
    let start = first_content_index(elements);
    let last = elements.len().saturating_sub(1);

    elements
        .iter()
        .enumerate()
        .skip(start)
        .filter(|(index, element)| match element {
            Element::Paragraph(p) => {
                !p.is_blank() || p.has_page_break() || p.has_drawing() || *index == last
            }
            _ => true,
        })
        .map(|(_, element)| element)
        .collect()
}

/// Number of non-blank paragraphs in a document.
pub fn content_paragraph_count(doc: &Document) -> usize {
    doc.paragraphs().filter(|p| !p.is_blank()).count()
}
