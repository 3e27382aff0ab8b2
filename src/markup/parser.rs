//! Lenient markup parser.
//!
//! Builds nodes straight into a [`Dom`] under a given parent. Recovery follows
//! the usual HTML habits: void elements never take children, an end tag closes
//! the nearest matching open element (or is ignored), and elements left open at
//! end of input are closed implicitly. Lexing failures are hard errors.

use logos::{Lexer, Logos};

use super::entities;
use super::tokenizer::{ContentToken, TagToken};
use crate::dom::serialize::is_void;
use crate::dom::{Dom, Element, NodeData, NodeId};

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Errors from markup parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// Parse `input` and append the resulting nodes to `parent`.
pub fn parse_into(dom: &mut Dom, parent: NodeId, input: &str) -> Result<(), ParseError> {
    let mut parser = Parser {
        dom,
        open: vec![parent],
    };
    parser.run(input)
}

/// Parse `input` into a fresh detached fragment of `dom`.
pub fn parse_fragment(dom: &mut Dom, input: &str) -> Result<NodeId, ParseError> {
    let fragment = dom.create_fragment();
    if let Err(err) = parse_into(dom, fragment, input) {
        dom.remove(fragment);
        return Err(err);
    }
    Ok(fragment)
}

struct Parser<'d> {
    dom: &'d mut Dom,
    /// Open elements; index 0 is the insertion parent and is never popped.
    open: Vec<NodeId>,
}

impl<'d> Parser<'d> {
    fn current(&self) -> NodeId {
        self.open[self.open.len() - 1]
    }

    fn run(&mut self, input: &str) -> Result<(), ParseError> {
        let mut lex = ContentToken::lexer(input);

        while let Some(result) = lex.next() {
            let token = result.map_err(|()| ParseError::UnexpectedToken {
                position: lex.span().start,
                message: format!("cannot lex '{}'", lex.slice()),
            })?;

            match token {
                ContentToken::Text | ContentToken::Lt => {
                    let text = entities::decode(lex.slice()).into_owned();
                    self.push_text(&text);
                }
                ContentToken::Comment => {
                    let slice = lex.slice();
                    let body = &slice[4..slice.len() - 3];
                    let parent = self.current();
                    self.dom.insert_child(parent, NodeData::Comment(body.to_owned()));
                }
                ContentToken::Declaration => {}
                ContentToken::EndTag => {
                    let slice = lex.slice();
                    let name = slice[2..slice.len() - 1].trim().to_ascii_lowercase();
                    self.close(&name);
                }
                ContentToken::StartTag => {
                    let tag = lex.slice()[1..].to_ascii_lowercase();
                    let mut tag_lex = lex.morph::<TagToken>();
                    let (attrs, self_closing) = read_attributes(&mut tag_lex)?;
                    lex = tag_lex.morph();

                    let parent = self.current();
                    let el = Element { tag: tag.clone(), attrs };
                    let id = self.dom.insert_child(parent, NodeData::Element(el));

                    if self_closing || is_void(&tag) {
                        continue;
                    }
                    if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                        let raw = take_raw_text(&mut lex, &tag);
                        if !raw.is_empty() {
                            self.dom.insert_child(id, NodeData::Text(raw));
                        }
                        continue;
                    }
                    self.open.push(id);
                }
            }
        }
        Ok(())
    }

    /// Append text, merging with a preceding text sibling.
    fn push_text(&mut self, text: &str) {
        let parent = self.current();
        if let Some(&last) = self.dom.children(parent).last() {
            if let Some(NodeData::Text(existing)) = self.dom.get_mut(last) {
                existing.push_str(text);
                return;
            }
        }
        self.dom.insert_child(parent, NodeData::text(text));
    }

    /// Pop up to and including the nearest open element named `name`.
    fn close(&mut self, name: &str) {
        let found = self
            .open
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|&(_, &id)| self.dom.get(id).is_some_and(|d| d.is_tag(name)))
            .map(|(i, _)| i);
        if let Some(i) = found {
            self.open.truncate(i);
        }
    }
}

/// Read attributes up to `>` or `/>`. Returns the attributes and whether the
/// tag was self-closing.
fn read_attributes(
    lex: &mut Lexer<'_, TagToken>,
) -> Result<(Vec<(String, String)>, bool), ParseError> {
    let mut attrs: Vec<(String, String)> = Vec::new();

    loop {
        let token = next_tag_token(lex)?;
        match token {
            TagToken::Close => return Ok((attrs, false)),
            TagToken::SelfClose => return Ok((attrs, true)),
            TagToken::Slash => {}
            TagToken::Word => {
                let name = lex.slice().to_ascii_lowercase();
                let mut probe = lex.clone();
                let value = if probe.next() == Some(Ok(TagToken::Eq)) {
                    *lex = probe;
                    read_value(lex)?
                } else {
                    String::new()
                };
                // First declaration of a name wins, as in HTML.
                if !attrs.iter().any(|(k, _)| *k == name) {
                    attrs.push((name, value));
                }
            }
            TagToken::Eq | TagToken::DoubleQuoted | TagToken::SingleQuoted => {
                return Err(ParseError::UnexpectedToken {
                    position: lex.span().start,
                    message: format!("expected attribute name, got '{}'", lex.slice()),
                });
            }
        }
    }
}

/// Read an attribute value after `=`.
fn read_value(lex: &mut Lexer<'_, TagToken>) -> Result<String, ParseError> {
    let token = next_tag_token(lex)?;
    let raw = match token {
        TagToken::DoubleQuoted | TagToken::SingleQuoted => {
            let slice = lex.slice();
            slice[1..slice.len() - 1].to_owned()
        }
        TagToken::Word | TagToken::Slash => {
            // Unquoted: glue together adjacent words and slashes.
            let mut value = lex.slice().to_owned();
            let mut end = lex.span().end;
            loop {
                let mut probe = lex.clone();
                match probe.next() {
                    Some(Ok(TagToken::Word | TagToken::Slash)) if probe.span().start == end => {
                        value.push_str(probe.slice());
                        end = probe.span().end;
                        *lex = probe;
                    }
                    _ => break,
                }
            }
            value
        }
        TagToken::Close | TagToken::SelfClose | TagToken::Eq => {
            return Err(ParseError::UnexpectedToken {
                position: lex.span().start,
                message: format!("expected attribute value, got '{}'", lex.slice()),
            });
        }
    };
    Ok(entities::decode(&raw).into_owned())
}

fn next_tag_token(lex: &mut Lexer<'_, TagToken>) -> Result<TagToken, ParseError> {
    match lex.next() {
        Some(Ok(token)) => Ok(token),
        Some(Err(())) => Err(ParseError::UnexpectedToken {
            position: lex.span().start,
            message: format!("unexpected '{}' inside tag", lex.slice()),
        }),
        None => Err(ParseError::UnexpectedEof("unterminated start tag".into())),
    }
}

/// Consume everything up to `</tag` (case-insensitive) and the end tag itself.
fn take_raw_text(lex: &mut Lexer<'_, ContentToken>, tag: &str) -> String {
    let rest = lex.remainder();
    let needle = format!("</{tag}");
    let lower = rest.to_ascii_lowercase();
    let Some(start) = lower.find(&needle) else {
        lex.bump(rest.len());
        return rest.to_owned();
    };
    let text = rest[..start].to_owned();
    let close = rest[start..].find('>').map_or(rest.len(), |i| start + i + 1);
    lex.bump(close);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roundtrip(input: &str) -> String {
        let mut dom = Dom::new();
        let frag = parse_fragment(&mut dom, input).unwrap();
        dom.inner_html(frag)
    }

    #[test]
    fn simple_elements_and_text() {
        assert_eq!(roundtrip("<p>Hello, <b>Ada</b>!</p>"), "<p>Hello, <b>Ada</b>!</p>");
    }

    #[test]
    fn tag_and_attribute_names_lowercased() {
        assert_eq!(
            roundtrip(r#"<GREET Name="Ada"></GREET>"#),
            r#"<greet name="Ada"></greet>"#
        );
    }

    #[test]
    fn attribute_forms() {
        let mut dom = Dom::new();
        let frag = parse_fragment(
            &mut dom,
            r#"<input type=text value='a "b"' disabled data-x="1 &amp; 2" href=/a/b>"#,
        )
        .unwrap();
        let input = dom.children(frag)[0];
        let el = dom.element(input).unwrap();
        assert_eq!(el.attr("type"), Some("text"));
        assert_eq!(el.attr("value"), Some(r#"a "b""#));
        assert_eq!(el.attr("disabled"), Some(""));
        assert_eq!(el.attr("data-x"), Some("1 & 2"));
        assert_eq!(el.attr("href"), Some("/a/b"));
    }

    #[test]
    fn duplicate_attribute_first_wins() {
        assert_eq!(roundtrip(r#"<a x="1" x="2"></a>"#), r#"<a x="1"></a>"#);
    }

    #[test]
    fn void_and_self_closing() {
        assert_eq!(roundtrip("<p>a<br>b<greet /></p>"), "<p>a<br>b<greet></greet></p>");
    }

    #[test]
    fn stray_end_tag_ignored_and_unclosed_closed() {
        assert_eq!(roundtrip("</span><div><p>x"), "<div><p>x</p></div>");
    }

    #[test]
    fn end_tag_closes_nested_open_elements() {
        assert_eq!(roundtrip("<div><p>x</div>y"), "<div><p>x</p></div>y");
    }

    #[test]
    fn text_entities_and_lone_lt() {
        assert_eq!(roundtrip("1 < 2 &amp; 3 &gt; 2"), "1 &lt; 2 &amp; 3 &gt; 2");
    }

    #[test]
    fn comments_and_declarations() {
        assert_eq!(roundtrip("<!DOCTYPE html><!-- c --><p></p>"), "<!-- c --><p></p>");
    }

    #[test]
    fn raw_text_elements() {
        let mut dom = Dom::new();
        let frag = parse_fragment(&mut dom, "<script>if (a < b) {}</SCRIPT><p></p>").unwrap();
        let kids = dom.children(frag).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(dom.text_content(kids[0]), "if (a < b) {}");
    }

    #[test]
    fn unterminated_tag_is_error() {
        let mut dom = Dom::new();
        let err = parse_fragment(&mut dom, "<div class=\"x\"").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEof("unterminated start tag".into()));
        // The failed fragment is not left behind.
        assert!(dom.is_empty());
    }

    #[test]
    fn unterminated_quote_is_error() {
        let mut dom = Dom::new();
        assert!(matches!(
            parse_fragment(&mut dom, r#"<div class="x>"#),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn unterminated_comment_is_error() {
        let mut dom = Dom::new();
        assert!(parse_fragment(&mut dom, "<!-- open").is_err());
    }
}
