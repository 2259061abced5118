//! Append strategies.
//!
//! A [`MergeStrategy`] appends one content-bearing source document to the
//! master. Two implementations share the same [`SplicePolicy`]:
//! - [`ManualSplicer`] copies a filtered window of elements and handles
//!   breaks and blank paragraphs itself
//! - [`ComposerDelegate`] hands the whole document to a [`Composer`] together
//!   with a [`BreakType`]

use crate::analysis::{
    ends_with_page_break, first_content_index, has_real_content, last_meaningful_element,
    splice_window, trim_trailing_blanks,
};
use crate::config::{MergeOptions, SplicePolicy, StrategyKind};
use crate::error::{DocMergeError, Result};
use crate::model::{Alignment, Document, Element, Paragraph, Run};

/// Width of the separator rule in characters.
pub const SEPARATOR_WIDTH: usize = 80;

/// Character the separator rule is drawn with.
pub const SEPARATOR_CHAR: char = '\u{2500}';

/// Identity of the document being appended.
#[derive(Debug, Clone, Copy)]
pub struct AppendContext<'a> {
    /// 1-based position in the input list
    pub index: usize,
    /// Display name
    pub name: &'a str,
}

/// Appends a source document to the master document.
///
/// Callers only pass sources with real content; skipping contentless
/// documents and updating statistics is the orchestrator's job.
pub trait MergeStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Append `source` to `master`.
    fn append(&self, master: &mut Document, source: &Document, ctx: AppendContext<'_>)
    -> Result<()>;
}

/// Build the strategy selected by the options.
pub fn strategy_for(options: &MergeOptions) -> Box<dyn MergeStrategy> {
    let policy = options.splice_policy();
    match options.strategy {
        StrategyKind::Manual => Box::new(ManualSplicer::new(policy)),
        StrategyKind::Composer => Box::new(ComposerDelegate::new(BodyComposer, policy)),
    }
}

/// Centered bold 14pt "Document N: name" header.
pub fn document_header(index: usize, name: &str) -> Paragraph {
    let mut p = Paragraph::new().aligned(Alignment::Center);
    p.add_run(
        Run::text(format!("Document {index}: {name}"))
            .bold(true)
            .size(14.0),
    );
    p
}

/// Centered gray 8pt horizontal rule.
pub fn separator() -> Paragraph {
    let rule: String = std::iter::repeat_n(SEPARATOR_CHAR, SEPARATOR_WIDTH).collect();
    let mut p = Paragraph::new().aligned(Alignment::Center);
    p.add_run(Run::text(rule).size(8.0).color("808080"));
    p
}

/// Header and separator paragraphs the policy asks for, in insertion order.
fn join_paragraphs(policy: &SplicePolicy, ctx: AppendContext<'_>) -> Vec<Paragraph> {
    let mut out = Vec::new();
    if policy.numbering {
        out.push(document_header(ctx.index, ctx.name));
    }
    if policy.separator {
        out.push(separator());
    }
    out
}

/// Whether a page break belongs before the next document.
///
/// Only when the master has something meaningful and does not already end in
/// a page break.
fn needs_page_break(policy: &SplicePolicy, master: &Document) -> bool {
    if !policy.page_break {
        return false;
    }
    if last_meaningful_element(master).is_none() {
        log::debug!("Master has no content yet, no page break");
        return false;
    }
    if ends_with_page_break(master) {
        log::debug!("Master already ends in a page break");
        return false;
    }
    true
}

/// Element-by-element splicing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualSplicer {
    policy: SplicePolicy,
}

impl ManualSplicer {
    /// Create a splicer with the given policy.
    pub fn new(policy: SplicePolicy) -> Self {
        Self { policy }
    }
}

impl MergeStrategy for ManualSplicer {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn append(
        &self,
        master: &mut Document,
        source: &Document,
        ctx: AppendContext<'_>,
    ) -> Result<()> {
        trim_trailing_blanks(master);

        if needs_page_break(&self.policy, master) {
            master.add_page_break();
        }

        for paragraph in join_paragraphs(&self.policy, ctx) {
            master.push(paragraph);
        }

        let window = splice_window(&source.elements);
        if window.is_empty() {
            return Err(DocMergeError::splice(format!(
                "{}: nothing to copy from a document with content",
                ctx.name
            )));
        }
        log::debug!(
            "Splicing {} of {} elements from {}",
            window.len(),
            source.elements.len(),
            ctx.name
        );

        master.root.adopt(&source.root);
        master.elements.extend(window.into_iter().cloned());

        trim_trailing_blanks(master);
        Ok(())
    }
}

/// Break to place between the master and an appended document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakType {
    /// Continue on the same page
    None,
    /// Start the appended document on a new page
    Page,
}

/// A whole-document merge primitive.
pub trait Composer: Send + Sync {
    /// Append all of `other` to `master`, separated by `break_type`.
    fn append(&self, master: &mut Document, other: &Document, break_type: BreakType)
    -> Result<()>;
}

/// Composer over the document body.
///
/// Leading blank paragraphs of the appended document are dropped, and a page
/// break is carried by the first appended paragraph instead of a paragraph of
/// its own, so a join never produces a break-only paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyComposer;

impl Composer for BodyComposer {
    fn append(
        &self,
        master: &mut Document,
        other: &Document,
        break_type: BreakType,
    ) -> Result<()> {
        trim_trailing_blanks(master);

        let start = first_content_index(&other.elements);
        let mut incoming: Vec<Element> = other.elements[start..].to_vec();

        if break_type == BreakType::Page {
            match incoming.first_mut() {
                Some(Element::Paragraph(first)) => first.prepend_run(Run::page_break()),
                _ => incoming.insert(0, Paragraph::page_break().into()),
            }
        }

        master.root.adopt(&other.root);
        master.elements.extend(incoming);
        trim_trailing_blanks(master);
        Ok(())
    }
}

/// Strategy that delegates the splice to a [`Composer`].
#[derive(Debug, Clone, Default)]
pub struct ComposerDelegate<C> {
    composer: C,
    policy: SplicePolicy,
}

impl<C: Composer> ComposerDelegate<C> {
    /// Wrap a composer.
    pub fn new(composer: C, policy: SplicePolicy) -> Self {
        Self { composer, policy }
    }
}

impl<C: Composer> MergeStrategy for ComposerDelegate<C> {
    fn name(&self) -> &'static str {
        "composer"
    }

    fn append(
        &self,
        master: &mut Document,
        source: &Document,
        ctx: AppendContext<'_>,
    ) -> Result<()> {
        trim_trailing_blanks(master);
        let break_type = if needs_page_break(&self.policy, master) {
            BreakType::Page
        } else {
            BreakType::None
        };

        let leading = join_paragraphs(&self.policy, ctx);
        if leading.is_empty() {
            return self.composer.append(master, source, break_type);
        }

        // Header and separator go right before the first content element so
        // the composer treats them as the start of the document.
        let mut prepared = source.shell();
        let start = first_content_index(&source.elements);
        prepared.elements.extend_from_slice(&source.elements[..start]);
        prepared
            .elements
            .extend(leading.into_iter().map(Element::from));
        prepared
            .elements
            .extend_from_slice(&source.elements[start..]);

        debug_assert!(has_real_content(&prepared));
        self.composer.append(master, &prepared, break_type)
    }
}
