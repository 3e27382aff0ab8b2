//! Shape-keyed template memoization.
//!
//! The first render of a template shape parses its segments (with placeholder
//! markers in between) into a skeleton tree. Every render, first or not,
//! deep-copies that skeleton into the caller's tree and substitutes the
//! dynamic values into the copy. Entries are never evicted.

use std::collections::HashMap;

use super::html::{Slot, Template, MARK_CLOSE, MARK_OPEN};
use crate::dom::{Dom, NodeData, NodeId};
use crate::markup::{parse_fragment, parse_into, ParseError};

/// A parsed template shape.
#[derive(Debug)]
struct Skeleton {
    dom: Dom,
    root: NodeId,
}

/// Append-only cache of template skeletons.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: HashMap<String, Skeleton>,
    parses: usize,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached shapes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times a skeleton has been parsed (cache misses).
    pub fn parses(&self) -> usize {
        self.parses
    }

    /// Materialize `template` as a detached fragment in `dom`.
    pub fn instantiate(&mut self, template: &Template, dom: &mut Dom) -> Result<NodeId, ParseError> {
        let key = template.shape_key();
        if !self.entries.contains_key(&key) {
            let skeleton = build_skeleton(template)?;
            self.parses += 1;
            log::debug!("template cache miss #{} ({} segments)", self.parses, template.strings().len());
            self.entries.insert(key.clone(), skeleton);
        }

        let skeleton = &self.entries[&key];
        let fragment = dom
            .import_subtree(&skeleton.dom, skeleton.root)
            .ok_or_else(|| ParseError::UnexpectedEof("template skeleton is empty".into()))?;

        if let Err(err) = substitute(dom, fragment, template.values()) {
            dom.remove(fragment);
            return Err(err);
        }
        Ok(fragment)
    }
}

fn build_skeleton(template: &Template) -> Result<Skeleton, ParseError> {
    let mut dom = Dom::new();
    let root = dom.create_fragment();
    parse_into(&mut dom, root, &template.skeleton_markup())?;

    // Split text nodes around markers into Text / Slot runs.
    for id in dom.walk_depth_first(root) {
        let text = match dom.get(id) {
            Some(NodeData::Text(text)) if text.contains(MARK_OPEN) => text.clone(),
            _ => continue,
        };
        for piece in split_markers(&text) {
            let node = match piece {
                Piece::Text(t) => NodeData::Text(t.to_owned()),
                Piece::Slot(i) => NodeData::Slot(i),
            };
            let new = dom.insert(node);
            dom.insert_before(id, new);
        }
        dom.remove(id);
    }

    Ok(Skeleton { dom, root })
}

fn substitute(dom: &mut Dom, fragment: NodeId, values: &[Slot]) -> Result<(), ParseError> {
    let mut slots = Vec::new();
    let mut attr_sites = Vec::new();
    for id in dom.walk_depth_first(fragment) {
        match dom.get(id) {
            Some(NodeData::Slot(i)) => slots.push((id, *i)),
            Some(NodeData::Element(el)) if el.attrs.iter().any(|(_, v)| v.contains(MARK_OPEN)) => {
                attr_sites.push(id)
            }
            _ => {}
        }
    }

    for id in attr_sites {
        if let Some(el) = dom.element_mut(id) {
            for (_, value) in el.attrs.iter_mut() {
                if value.contains(MARK_OPEN) {
                    *value = fill_markers(value, values);
                }
            }
        }
    }

    for (id, index) in slots {
        match values.get(index) {
            Some(Slot::Text(text)) => {
                if let Some(node) = dom.get_mut(id) {
                    *node = NodeData::Text(text.clone());
                }
            }
            Some(Slot::Html(markup)) => {
                let parsed = parse_fragment(dom, markup)?;
                for child in dom.children(parsed).to_vec() {
                    dom.insert_before(id, child);
                }
                dom.remove(parsed);
                dom.remove(id);
            }
            None => {
                dom.remove(id);
            }
        }
    }
    Ok(())
}

enum Piece<'a> {
    Text(&'a str),
    Slot(usize),
}

/// Split `text` into literal runs and marker indices.
fn split_markers(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some((before, index, after)) = next_marker(rest) {
        if !before.is_empty() {
            pieces.push(Piece::Text(before));
        }
        pieces.push(Piece::Slot(index));
        rest = after;
    }
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }
    pieces
}

/// Replace every marker in an attribute value with its slot text.
fn fill_markers(value: &str, values: &[Slot]) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some((before, index, after)) = next_marker(rest) {
        out.push_str(before);
        if let Some(slot) = values.get(index) {
            out.push_str(slot.as_str());
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Find the next well-formed marker: `(text before, index, text after)`.
fn next_marker(text: &str) -> Option<(&str, usize, &str)> {
    let open = text.find(MARK_OPEN)?;
    let digits_start = open + MARK_OPEN.len_utf8();
    let close = digits_start + text[digits_start..].find(MARK_CLOSE)?;
    let index = text[digits_start..close].parse().ok()?;
    Some((&text[..open], index, &text[close + MARK_CLOSE.len_utf8()..]))
}
