//! Main document part → model.

use crate::error::{DocMergeError, Result};
use crate::model::{
    Alignment, BreakKind, Element, Inline, OpaqueBlock, OpaqueInline, Paragraph,
    ParagraphProperties, RawXml, RootTag, Run, RunContent, RunProperties, Table, W_NS,
};
use roxmltree::Node;

const XML_PREFIX: &str = "xml";

/// Parsed content of the main part.
pub(super) struct ParsedBody {
    pub root: RootTag,
    pub elements: Vec<Element>,
    pub section: Option<RawXml>,
}

pub(super) fn parse_main_part(xml: &str) -> Result<ParsedBody> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| DocMergeError::invalid_package("", format!("malformed document XML: {e}")))?;
    let root = doc.root_element();

    let body = root
        .children()
        .find(|n| is_w(*n, "body"))
        .ok_or_else(|| DocMergeError::invalid_package("", "document has no body"))?;

    let mut elements = Vec::new();
    let mut section = None;
    for child in body.children().filter(Node::is_element) {
        if is_w(child, "p") {
            elements.push(Element::Paragraph(parse_paragraph(child, xml)));
        } else if is_w(child, "tbl") {
            elements.push(Element::Table(parse_table(child, xml)));
        } else if is_w(child, "sectPr") {
            section = Some(raw(child, xml));
        } else {
            elements.push(Element::Opaque(OpaqueBlock {
                raw: raw(child, xml),
                text: descendant_text(child),
            }));
        }
    }

    Ok(ParsedBody {
        root: parse_root(root),
        elements,
        section,
    })
}

fn parse_root(node: Node) -> RootTag {
    let namespaces = node
        .namespaces()
        .filter(|ns| ns.name() != Some(XML_PREFIX))
        .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
        .collect();

    let attributes = node
        .attributes()
        .map(|attr| {
            let name = match attr.namespace().and_then(|uri| node.lookup_prefix(uri)) {
                Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", attr.name()),
                _ => attr.name().to_string(),
            };
            (name, attr.value().to_string())
        })
        .collect();

    RootTag {
        name: qualified_name(node),
        namespaces,
        attributes,
    }
}

fn qualified_name(node: Node) -> String {
    let local = node.tag_name().name();
    match node
        .tag_name()
        .namespace()
        .and_then(|uri| node.lookup_prefix(uri))
    {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

fn parse_paragraph(node: Node, xml: &str) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for child in node.children().filter(Node::is_element) {
        if is_w(child, "pPr") {
            paragraph.properties = parse_paragraph_properties(child, xml);
        } else if is_w(child, "r") {
            paragraph.content.push(Inline::Run(parse_run(child, xml)));
        } else {
            paragraph.content.push(Inline::Opaque(OpaqueInline {
                raw: raw(child, xml),
                text: descendant_text(child),
                page_break: child.descendants().any(is_page_break),
            }));
        }
    }
    paragraph
}

fn parse_paragraph_properties(node: Node, xml: &str) -> ParagraphProperties {
    let mut props = ParagraphProperties {
        raw: Some(raw(node, xml)),
        ..Default::default()
    };
    for child in node.children().filter(Node::is_element) {
        match w_name(child) {
            Some("pStyle") => props.style = w_val(child).map(str::to_string),
            Some("jc") => props.alignment = w_val(child).and_then(Alignment::from_ooxml),
            Some("sectPr") => props.section_break = true,
            _ => {}
        }
    }
    props
}

fn parse_run(node: Node, xml: &str) -> Run {
    let mut run = Run::new();
    for child in node.children().filter(Node::is_element) {
        let content = match w_name(child) {
            Some("rPr") => {
                run.properties = parse_run_properties(child, xml);
                continue;
            }
            Some("t") => RunContent::Text(child.text().unwrap_or_default().to_string()),
            Some("tab") => RunContent::Tab,
            Some("br") => RunContent::Break(break_kind(child)),
            Some("cr") => RunContent::Break(BreakKind::Line),
            Some("drawing" | "pict" | "object") => RunContent::Drawing(raw(child, xml)),
            _ => RunContent::Raw(raw(child, xml)),
        };
        run.content.push(content);
    }
    run
}

fn parse_run_properties(node: Node, xml: &str) -> RunProperties {
    let mut props = RunProperties {
        raw: Some(raw(node, xml)),
        ..Default::default()
    };
    for child in node.children().filter(Node::is_element) {
        match w_name(child) {
            Some("b") => props.bold = on_off(child),
            Some("i") => props.italic = on_off(child),
            Some("u") => props.underline = w_val(child) != Some("none"),
            Some("sz") => {
                props.size_pt = w_val(child)
                    .and_then(|v| v.parse::<f32>().ok())
                    .map(|half_points| half_points / 2.0);
            }
            Some("color") => props.color = w_val(child).map(str::to_string),
            _ => {}
        }
    }
    props
}

fn parse_table(node: Node, xml: &str) -> Table {
    let rows = node
        .children()
        .filter(|n| is_w(*n, "tr"))
        .map(|row| {
            row.children()
                .filter(|n| is_w(*n, "tc"))
                .map(descendant_text)
                .collect()
        })
        .collect();

    Table {
        rows,
        raw: raw(node, xml),
    }
}

fn break_kind(node: Node) -> BreakKind {
    match node.attribute((W_NS, "type")) {
        Some("page") => BreakKind::Page,
        Some("column") => BreakKind::Column,
        _ => BreakKind::Line,
    }
}

fn is_page_break(node: Node) -> bool {
    is_w(node, "br") && break_kind(node) == BreakKind::Page
}

/// Toggle properties are on when `w:val` is absent or truthy.
fn on_off(node: Node) -> bool {
    match w_val(node) {
        None => true,
        Some(v) => matches!(v, "1" | "true" | "on"),
    }
}

fn descendant_text(node: Node) -> String {
    node.descendants()
        .filter(|n| is_w(*n, "t"))
        .filter_map(|n| n.text())
        .collect()
}

fn raw(node: Node, xml: &str) -> RawXml {
    RawXml::new(&xml[node.range()])
}

fn is_w(node: Node, local: &str) -> bool {
    node.is_element() && node.has_tag_name((W_NS, local))
}

fn w_name<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    (node.tag_name().namespace() == Some(W_NS)).then(|| node.tag_name().name())
}

fn w_val<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((W_NS, "val"))
}
