//! Model → main document part.

use crate::error::Result;
use crate::model::{
    BreakKind, Document, Element, Inline, Paragraph, ParagraphProperties, RawXml, Run, RunContent,
    RunProperties, W_NS,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

type XmlWriter = Writer<Vec<u8>>;

pub(super) fn write_main_part(doc: &Document) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        Some("yes"),
    )))?;

    let mut root = doc.root.clone();
    if !root.declares(Some("w")) {
        root.namespaces.push((Some("w".to_string()), W_NS.to_string()));
    }

    let mut start = BytesStart::new(root.name.as_str());
    for (prefix, uri) in &root.namespaces {
        let key = match prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        start.push_attribute((key.as_str(), uri.as_str()));
    }
    for (name, value) in &root.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for element in &doc.elements {
        match element {
            Element::Paragraph(p) => write_paragraph(&mut writer, p)?,
            Element::Table(t) => write_raw(&mut writer, &t.raw),
            Element::Opaque(o) => write_raw(&mut writer, &o.raw),
        }
    }
    if let Some(section) = &doc.section {
        write_raw(&mut writer, section);
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new(root.name.as_str())))?;
    Ok(writer.into_inner())
}

fn write_paragraph(writer: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    write_paragraph_properties(writer, &paragraph.properties)?;
    for inline in &paragraph.content {
        match inline {
            Inline::Run(run) => write_run(writer, run)?,
            Inline::Opaque(o) => write_raw(writer, &o.raw),
        }
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_paragraph_properties(writer: &mut XmlWriter, props: &ParagraphProperties) -> Result<()> {
    if let Some(raw) = &props.raw {
        write_raw(writer, raw);
        return Ok(());
    }
    if props.style.is_none() && props.alignment.is_none() {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
    if let Some(style) = &props.style {
        write_val(writer, "w:pStyle", style)?;
    }
    if let Some(alignment) = props.alignment {
        write_val(writer, "w:jc", alignment.as_ooxml())?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
    Ok(())
}

fn write_run(writer: &mut XmlWriter, run: &Run) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    write_run_properties(writer, &run.properties)?;

    for item in &run.content {
        match item {
            RunContent::Text(text) => {
                let start = BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]);
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new("w:t")))?;
            }
            RunContent::Tab => writer.write_event(Event::Empty(BytesStart::new("w:tab")))?,
            RunContent::Break(kind) => {
                let mut br = BytesStart::new("w:br");
                match kind {
                    BreakKind::Page => br.push_attribute(("w:type", "page")),
                    BreakKind::Column => br.push_attribute(("w:type", "column")),
                    BreakKind::Line => {}
                }
                writer.write_event(Event::Empty(br))?;
            }
            RunContent::Drawing(raw) | RunContent::Raw(raw) => write_raw(writer, raw),
        }
    }

    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn write_run_properties(writer: &mut XmlWriter, props: &RunProperties) -> Result<()> {
    if let Some(raw) = &props.raw {
        write_raw(writer, raw);
        return Ok(());
    }
    if !props.has_emphasis() && props.size_pt.is_none() && props.color.is_none() {
        return Ok(());
    }

    // Element order follows the CT_RPr sequence.
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    if props.bold {
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    }
    if props.italic {
        writer.write_event(Event::Empty(BytesStart::new("w:i")))?;
    }
    if let Some(color) = &props.color {
        write_val(writer, "w:color", color)?;
    }
    if let Some(size) = props.size_pt {
        let half_points = ((size * 2.0).round() as u32).to_string();
        write_val(writer, "w:sz", &half_points)?;
        write_val(writer, "w:szCs", &half_points)?;
    }
    if props.underline {
        write_val(writer, "w:u", "single")?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    Ok(())
}

fn write_val(writer: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    let element = BytesStart::new(name).with_attributes([("w:val", value)]);
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn write_raw(writer: &mut XmlWriter, raw: &RawXml) {
    writer.get_mut().extend_from_slice(raw.as_str().as_bytes());
}
