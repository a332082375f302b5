use std::io::Read;

use xml::{reader, writer, EmitterConfig};

use crate::{error::Result, minimizer::parser_config, scope::Scopes};

/// Re-indents a document with a single space per level.
///
/// Whitespace-only text between elements is replaced by the indentation. It is
/// kept when it is the whole content of an element, and all other content is
/// kept verbatim. The result ends with a newline.
pub fn reformat<R: Read>(source: R) -> Result<String> {
    let mut parser = parser_config().create_reader(source);
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .indent_string(" ")
        .write_document_declaration(true)
        .create_writer(Vec::new());
    let mut scopes = Scopes::new();
    // whitespace seen right after a start tag, written only if the element closes next
    let mut held: Option<String> = None;
    let mut just_opened = false;
    loop {
        let event = parser.next()?;
        let opened = std::mem::replace(&mut just_opened, false);
        match event {
            reader::XmlEvent::StartDocument {
                version,
                standalone,
                ..
            } => writer.write(writer::XmlEvent::StartDocument {
                version,
                encoding: Some("UTF-8"),
                standalone,
            })?,
            reader::XmlEvent::StartElement {
                name,
                attributes,
                namespace,
            } => {
                held = None;
                let introduced = scopes.enter(&namespace);
                let mut start = writer::XmlEvent::start_element(name.borrow());
                for (prefix, uri) in &introduced {
                    start = start.ns(prefix, uri);
                }
                for attribute in &attributes {
                    start = start.attr(attribute.name.borrow(), &attribute.value);
                }
                writer.write(start)?;
                just_opened = true;
            }
            reader::XmlEvent::EndElement { .. } => {
                scopes.exit();
                if let Some(content) = held.take() {
                    writer.write(writer::XmlEvent::characters(&content))?;
                }
                writer.write(writer::XmlEvent::end_element())?;
            }
            reader::XmlEvent::Whitespace(content) if opened => {
                held = Some(content);
                just_opened = true;
            }
            reader::XmlEvent::Characters(content) => {
                held = None;
                writer.write(writer::XmlEvent::characters(&content))?
            }
            reader::XmlEvent::EndDocument => break,
            _ => held = None,
        }
    }
    let mut output = String::from_utf8(writer.into_inner())?;
    output.push('\n');
    Ok(output)
}
