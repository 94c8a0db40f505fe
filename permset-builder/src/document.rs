//! Permission set XML generation.

use metadata_xml::{write_document, WriteError, XmlNode};
use tracing::debug;

use crate::entry::PermissionEntry;
use crate::permissions::PermissionMap;

/// Namespace of Salesforce metadata API documents.
pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";
/// Root element of a permission set document.
pub const PERMISSION_SET_ROOT: &str = "PermissionSet";
/// File suffix of permission set documents.
pub const PERMISSION_SET_SUFFIX: &str = ".permissionset-meta.xml";

/// Everything needed to build one permission set document.
#[derive(Debug, Clone, Copy)]
pub struct PermissionSetSpec<'a> {
    /// API name; becomes the file name, not part of the document body.
    pub name: &'a str,
    pub label: &'a str,
    pub description: &'a str,
    pub permissions: &'a PermissionMap,
}

/// Build the document tree for a permission set.
///
/// Header fields come first, then entries grouped by category in output
/// order. Empty categories contribute no elements.
pub fn build(spec: &PermissionSetSpec<'_>) -> XmlNode {
    let mut root =
        XmlNode::new(PERMISSION_SET_ROOT).with_attribute("xmlns", METADATA_NAMESPACE);
    root.push_leaf("description", spec.description);
    root.push_leaf("hasActivationRequired", "false");
    root.push_leaf("label", spec.label);

    for (_, entries) in spec.permissions.iter() {
        root.children.extend(entries.iter().map(entry_node));
    }

    debug!(
        permission_set = spec.name,
        entries = spec.permissions.total(),
        "built permission set document"
    );
    root
}

/// Build and serialize a permission set document.
pub fn render(spec: &PermissionSetSpec<'_>) -> Result<String, WriteError> {
    write_document(&build(spec))
}

/// File name for a permission set API name.
pub fn file_name(name: &str) -> String {
    format!("{name}{PERMISSION_SET_SUFFIX}")
}

fn entry_node(entry: &PermissionEntry) -> XmlNode {
    let mut node = XmlNode::new(entry.category().key());
    for (spec, value) in entry.fields() {
        if let Some(text) = value.as_xml_text() {
            node.push_leaf(spec.name, text);
        }
    }
    node
}
