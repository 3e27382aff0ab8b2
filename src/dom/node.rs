//! Node types: NodeId, NodeData, Element.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a tree node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// An element: tag plus ordered attributes.
///
/// The parser lowercases tag and attribute names, so lookups here are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name (e.g. "div", "greet").
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the element declares the named attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute. Returns the old value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check whether this element has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_owned(),
        };
        self.set_attr("class", joined);
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// A detached container for a list of nodes (the working snapshot, a
    /// rendered template). Never serialized itself.
    Fragment,
    /// An element with tag and attributes.
    Element(Element),
    /// Decoded text content.
    Text(String),
    /// A comment body (without `<!--`/`-->`).
    Comment(String),
    /// A template placeholder awaiting substitution with dynamic value `n`.
    Slot(usize),
}

impl NodeData {
    /// Shorthand for an element node with no attributes.
    pub fn element(tag: impl Into<String>) -> Self {
        NodeData::Element(Element::new(tag))
    }

    /// Shorthand for a text node.
    pub fn text(text: impl Into<String>) -> Self {
        NodeData::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Whether this is an element with the given tag.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|el| el.tag == tag)
    }

    /// Whether this is a text node containing only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, NodeData::Text(t) if t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults() {
        let el = Element::new("div");
        assert_eq!(el.tag, "div");
        assert!(el.attrs.is_empty());
        assert!(el.id().is_none());
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut el = Element::new("p").with_attr("a", "1").with_attr("b", "2");
        el.set_attr("a", "3");
        assert_eq!(
            el.attrs,
            vec![("a".to_owned(), "3".to_owned()), ("b".to_owned(), "2".to_owned())]
        );
    }

    #[test]
    fn remove_attr() {
        let mut el = Element::new("p").with_attr("a", "1");
        assert_eq!(el.remove_attr("a").as_deref(), Some("1"));
        assert!(el.remove_attr("a").is_none());
        assert!(!el.has_attr("a"));
    }

    #[test]
    fn classes_split_on_whitespace() {
        let el = Element::new("p").with_attr("class", " primary  large ");
        assert_eq!(el.classes().collect::<Vec<_>>(), vec!["primary", "large"]);
        assert!(el.has_class("large"));
        assert!(!el.has_class("small"));
    }

    #[test]
    fn add_class_idempotent() {
        let mut el = Element::new("p");
        el.add_class("foo");
        el.add_class("foo");
        el.add_class("bar");
        assert_eq!(el.attr("class"), Some("foo bar"));
    }

    #[test]
    fn blank_text() {
        assert!(NodeData::text(" \n\t").is_blank_text());
        assert!(!NodeData::text(" x ").is_blank_text());
        assert!(!NodeData::Fragment.is_blank_text());
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
