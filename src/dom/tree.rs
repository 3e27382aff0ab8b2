//! Tree operations: insert, remove, replace, reparent, copy, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Element, NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The markup tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// Nodes without a parent are detached; the first inserted one is the root.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Parse `markup` into a new tree whose root is a `<body>` element.
    pub fn parse(markup: &str) -> Result<Self, crate::markup::ParseError> {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::element("body"));
        crate::markup::parse_into(&mut dom, body, markup)?;
        Ok(dom)
    }

    /// Insert a detached node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a detached fragment container.
    pub fn create_fragment(&mut self) -> NodeId {
        let id = self.nodes.insert(NodeData::Fragment);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            kids.push(id);
        }
        id
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        if self.root == Some(id) {
            self.root = None;
        }

        // Collect all descendants (BFS) to remove them.
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Detach a node from its parent, keeping its subtree intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
    }

    /// Move `node` to become the last child of `new_parent`.
    ///
    /// The node keeps its subtree intact and is detached from any previous
    /// parent first.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) {
        debug_assert!(self.nodes.contains_key(node), "node does not exist");
        debug_assert!(
            self.nodes.contains_key(new_parent),
            "new_parent does not exist"
        );

        self.detach(node);
        self.parent.insert(node, new_parent);
        if let Some(kids) = self.children.get_mut(new_parent) {
            kids.push(node);
        }
    }

    /// Move `node` so it sits immediately before `reference` under the same parent.
    ///
    /// No-op when `reference` has no parent.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent_id) = self.parent(reference) else {
            return;
        };
        self.detach(node);
        if let Some(siblings) = self.children.get_mut(parent_id) {
            let pos = siblings
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(siblings.len());
            siblings.insert(pos, node);
        }
        self.parent.insert(node, parent_id);
    }

    /// Put `new` where `old` is and delete `old` with its subtree.
    ///
    /// When `old` is detached, `new` is simply left detached.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        self.insert_before(old, new);
        self.remove(old);
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from).to_vec() {
            self.reparent(child, to);
        }
    }

    /// Delete all children of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    /// Deep-copy the subtree at `id` in `src` into this tree, detached.
    pub fn import_subtree(&mut self, src: &Dom, id: NodeId) -> Option<NodeId> {
        let data = src.get(id)?.clone();
        let copy = self.nodes.insert(data);
        self.children.insert(copy, Vec::new());
        let mut stack = vec![(id, copy)];
        while let Some((from, to)) = stack.pop() {
            for &child in src.children(from) {
                if let Some(data) = src.get(child) {
                    let new = self.insert_child(to, data.clone());
                    stack.push((child, new));
                }
            }
        }
        Some(copy)
    }

    /// Deep-copy the subtree at `id` within this tree, detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let mut snapshot = Dom::new();
        let root = snapshot.import_subtree(self, id)?;
        self.import_subtree(&snapshot, root)
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to its top-most ancestor, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `id` sits somewhere below `ancestor`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The element at `id`, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id).and_then(NodeData::as_element)
    }

    /// Mutable element access.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id).and_then(NodeData::as_element_mut)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        self.walk_depth_first(id)
            .into_iter()
            .filter_map(|n| match self.get(n) {
                Some(NodeData::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::element("body"));
        let a = dom.insert_child(root, NodeData::element("section"));
        let b = dom.insert_child(root, NodeData::element("aside"));
        let c = dom.insert_child(a, NodeData::element("button"));
        let d = dom.insert_child(a, NodeData::text("label"));
        (dom, root, a, b, c, d)
    }

    #[test]
    fn insert_sets_root_once() {
        let mut dom = Dom::new();
        let first = dom.insert(NodeData::element("a"));
        let _second = dom.insert(NodeData::element("b"));
        assert_eq!(dom.root(), Some(first));
    }

    #[test]
    fn fragment_does_not_become_root() {
        let mut dom = Dom::new();
        let frag = dom.create_fragment();
        assert_eq!(dom.root(), None);
        assert_eq!(dom.get(frag), Some(&NodeData::Fragment));
    }

    #[test]
    fn parent_and_children() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.parent(a), Some(root));
        assert_eq!(dom.parent(root), None);
        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.children(a), &[c, d]);
        assert!(dom.children(c).is_empty());
    }

    #[test]
    fn ancestors_and_descendant_check() {
        let (dom, root, a, b, c, _d) = build_tree();
        assert_eq!(dom.ancestors(c), vec![a, root]);
        assert!(dom.is_descendant_of(c, root));
        assert!(!dom.is_descendant_of(c, b));
        assert!(!dom.is_descendant_of(root, root));
    }

    #[test]
    fn remove_subtree() {
        let (mut dom, root, a, b, c, d) = build_tree();
        dom.remove(a);
        assert!(!dom.contains(a));
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
        assert_eq!(dom.children(root), &[b]);
        assert_eq!(dom.len(), 2);
    }

    #[test]
    fn remove_root_clears_root() {
        let (mut dom, root, ..) = build_tree();
        dom.remove(root);
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
        assert!(dom.remove(root).is_none());
    }

    #[test]
    fn insert_before_positions_node() {
        let (mut dom, root, a, b, ..) = build_tree();
        let n = dom.insert(NodeData::element("hr"));
        dom.insert_before(b, n);
        assert_eq!(dom.children(root), &[a, n, b]);
    }

    #[test]
    fn replace_swaps_and_deletes() {
        let (mut dom, root, a, b, c, _d) = build_tree();
        let n = dom.insert(NodeData::element("main"));
        dom.replace(a, n);
        assert_eq!(dom.children(root), &[n, b]);
        assert!(!dom.contains(a));
        assert!(!dom.contains(c));
    }

    #[test]
    fn reparent_and_move_children() {
        let (mut dom, root, a, b, c, d) = build_tree();
        dom.reparent(c, b);
        assert_eq!(dom.ancestors(c), vec![b, root]);
        dom.move_children(a, b);
        assert_eq!(dom.children(b), &[c, d]);
        assert!(dom.children(a).is_empty());
    }

    #[test]
    fn clear_children() {
        let (mut dom, _root, a, _b, c, d) = build_tree();
        dom.clear_children(a);
        assert!(dom.children(a).is_empty());
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
    }

    #[test]
    fn clone_subtree_is_deep_and_detached() {
        let (mut dom, _root, a, ..) = build_tree();
        let copy = dom.clone_subtree(a).unwrap();
        assert_ne!(copy, a);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.children(copy).len(), 2);
        assert_eq!(dom.text_content(copy), "label");
    }

    #[test]
    fn import_subtree_across_trees() {
        let (src, _root, a, ..) = build_tree();
        let mut dst = Dom::new();
        let copy = dst.import_subtree(&src, a).unwrap();
        assert_eq!(dst.len(), 3);
        assert!(dst.get(copy).unwrap().is_tag("section"));
    }

    #[test]
    fn walk_depth_first() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(dom.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn default_impl() {
        let dom = Dom::default();
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }
}
