//! Markup serialization: outer/inner HTML with escaping.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Whether `tag` is a void element.
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value (`&`, `"`).
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

impl Dom {
    /// Serialize a node including its own tag.
    ///
    /// Fragments serialize as their children.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };
        match data {
            NodeData::Fragment => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void(&el.tag) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            // Unsubstituted placeholders render as nothing.
            NodeData::Slot(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::Element;

    #[test]
    fn escapes() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_attr(r#"say "hi" & go"#), "say &quot;hi&quot; &amp; go");
    }

    #[test]
    fn outer_and_inner_html() {
        let mut dom = Dom::new();
        let div = dom.insert(NodeData::Element(
            Element::new("div").with_attr("class", "x").with_attr("hidden", ""),
        ));
        let p = dom.insert_child(div, NodeData::element("p"));
        dom.insert_child(p, NodeData::text("1 < 2"));
        dom.insert_child(div, NodeData::element("br"));
        dom.insert_child(div, NodeData::Comment(" note ".into()));

        assert_eq!(
            dom.outer_html(div),
            r#"<div class="x" hidden><p>1 &lt; 2</p><br><!-- note --></div>"#
        );
        assert_eq!(dom.inner_html(div), "<p>1 &lt; 2</p><br><!-- note -->");
    }

    #[test]
    fn fragment_serializes_children_only() {
        let mut dom = Dom::new();
        let frag = dom.create_fragment();
        dom.insert_child(frag, NodeData::element("a"));
        dom.insert_child(frag, NodeData::element("b"));
        dom.insert_child(frag, NodeData::Slot(0));
        assert_eq!(dom.outer_html(frag), "<a></a><b></b>");
    }
}
