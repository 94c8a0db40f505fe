use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::tree::XmlNode;

const INDENT_WIDTH: usize = 4;

/// Errors that can occur while writing XML from an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write the output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
    /// Serialized bytes were not valid UTF-8.
    #[error("serialized XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize an element tree into indented XML bytes without a declaration.
pub fn write(node: &XmlNode) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    write_node(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// Serialize a complete document: UTF-8 declaration, indented tree and a
/// trailing newline.
pub fn write_document(node: &XmlNode) -> Result<String, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, node)?;

    let mut out = String::from_utf8(writer.into_inner())?;
    out.push('\n');
    Ok(out)
}

/// Serialize a complete document and write it to `path`.
pub fn write_file(node: &XmlNode, path: &Path) -> Result<(), WriteError> {
    let document = write_document(node)?;
    fs::write(path, document)?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }

    for child in &node.children {
        write_node(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}
