//! Tree queries: simple selectors (`tag`, `#id`, `.class` and compounds),
//! by tag within a scope, generic predicate matching.

use super::node::{Element, NodeData, NodeId};
use super::tree::Dom;

/// A compound simple selector such as `div`, `#app`, `.card` or `main#app.wide`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    /// Parse a selector string. Returns `None` for an empty or malformed selector.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }

        let mut selector = Selector::default();
        // Split before each '#' / '.' while keeping the sigil.
        let mut parts = Vec::new();
        let mut start = 0;
        for (i, ch) in input.char_indices().skip(1) {
            if ch == '#' || ch == '.' {
                parts.push(&input[start..i]);
                start = i;
            }
        }
        parts.push(&input[start..]);

        for part in parts {
            if let Some(id) = part.strip_prefix('#') {
                if id.is_empty() || selector.id.is_some() {
                    return None;
                }
                selector.id = Some(id.to_owned());
            } else if let Some(class) = part.strip_prefix('.') {
                if class.is_empty() {
                    return None;
                }
                selector.classes.push(class.to_owned());
            } else if selector.tag.is_none() {
                selector.tag = Some(part.to_ascii_lowercase());
            } else {
                return None;
            }
        }
        Some(selector)
    }

    /// Whether `el` satisfies every part of this selector.
    pub fn matches(&self, el: &Element) -> bool {
        self.tag.as_deref().is_none_or(|t| el.tag == t)
            && self.id.as_deref().is_none_or(|id| el.id() == Some(id))
            && self.classes.iter().all(|c| el.has_class(c))
    }
}

impl Dom {
    /// First element in document order (from the root) matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        let root = self.root()?;
        self.walk_depth_first(root)
            .into_iter()
            .find(|&id| self.element(id).is_some_and(|el| selector.matches(el)))
    }

    /// All elements below `scope` (excluding `scope`) with the given tag, in
    /// document order.
    pub fn query_by_tag_within(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.walk_depth_first(scope)
            .into_iter()
            .skip(1)
            .filter(|&id| self.get(id).is_some_and(|data| data.is_tag(tag)))
            .collect()
    }

    /// Find the first element whose `id` attribute matches, anywhere in the arena.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_all(|data| data.as_element().and_then(Element::id) == Some(id))
            .into_iter()
            .next()
    }

    /// Find all nodes in the arena matching an arbitrary predicate.
    ///
    /// Iterates in slotmap insertion order, which is deterministic but not tree order.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }
}
