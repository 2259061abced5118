//! Cover page and table of contents passes.

use crate::analysis::{has_real_content, trim_trailing_blanks};
use crate::config::CoverPage;
use crate::model::{Alignment, Document, Element, Paragraph, Run};

/// Heading of the generated table of contents.
pub const TOC_HEADING: &str = "Table of Contents";

/// Subtitle used when the cover page does not set one.
pub fn default_subtitle() -> String {
    format!(
        "Generated on {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    )
}

fn centered(run: Run) -> Paragraph {
    let mut p = Paragraph::new().aligned(Alignment::Center);
    p.add_run(run);
    p
}

/// Insert a title page at the start of the document.
///
/// A page break follows the cover only when the rest of the document has
/// real content, so a cover on an empty document stands alone.
pub fn add_cover_page(doc: &mut Document, cover: &CoverPage) {
    let body_has_content = has_real_content(doc);

    let subtitle = cover
        .subtitle
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_subtitle);

    let mut block: Vec<Element> = vec![
        centered(Run::text(cover.title.clone()).bold(true).size(24.0)).into(),
        centered(Run::text(subtitle).italic(true).size(12.0)).into(),
    ];
    if let Some(info) = cover.info.as_ref().filter(|s| !s.trim().is_empty()) {
        block.push(centered(Run::text(info.clone())).into());
    }
    if body_has_content {
        block.push(Paragraph::page_break().into());
    }

    log::debug!("Adding cover page '{}'", cover.title);
    block.append(&mut doc.elements);
    doc.elements = block;
}

/// Append a listing of document names.
///
/// A page break precedes the listing when the document has content; the
/// listing always ends with a page break.
pub fn add_table_of_contents(doc: &mut Document, names: &[String]) {
    trim_trailing_blanks(doc);
    if has_real_content(doc) {
        doc.add_page_break();
    }

    doc.push(centered(Run::text(TOC_HEADING).bold(true).size(18.0)));
    for (number, name) in names.iter().enumerate() {
        doc.add_paragraph(format!("{}. {}", number + 1, name));
    }
    doc.add_page_break();
    log::debug!("Added table of contents with {} entries", names.len());
}
