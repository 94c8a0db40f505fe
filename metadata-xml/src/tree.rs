use std::collections::BTreeMap;

/// A generic XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Element tag name, including any namespace prefix as written.
    pub tag: String,
    /// Attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated text content, if any non-whitespace text was present.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create an element with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a leaf element holding `text`.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(text.into());
        node
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append a leaf child element holding `text`.
    pub fn push_leaf(&mut self, tag: impl Into<String>, text: impl Into<String>) {
        self.children.push(Self::leaf(tag, text));
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag, in document order.
    pub fn get_children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Trimmed text of the first child named `tag`.
    ///
    /// Returns `None` when the child is missing. A child that exists but has
    /// no text yields `Some("")`.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.get_child(tag)
            .map(|child| child.text.as_deref().map(str::trim).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::XmlNode;

    #[test]
    fn child_text_trims_and_distinguishes_missing_from_empty() {
        let mut node = XmlNode::new("tabVisibilities");
        node.push_leaf("tab", "  standard-Account \n");
        node.children.push(XmlNode::new("visibility"));

        assert_eq!(node.child_text("tab"), Some("standard-Account"));
        assert_eq!(node.child_text("visibility"), Some(""));
        assert_eq!(node.child_text("other"), None);
    }

    #[test]
    fn get_children_filters_by_tag_in_order() {
        let mut root = XmlNode::new("Profile");
        root.push_leaf("userPermissions", "a");
        root.push_leaf("custom", "x");
        root.push_leaf("userPermissions", "b");

        let texts: Vec<_> = root
            .get_children("userPermissions")
            .filter_map(|n| n.text.as_deref())
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
