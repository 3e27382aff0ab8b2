//! Snapshot rendering helpers.

use crate::dom::Dom;
use crate::engine::Signature;
use crate::error::Interrupted;
use crate::markup::ParseError;

/// Mount `markup` inside a fresh `<body>` with `signature` and return the
/// serialized body content.
///
/// # Panics
///
/// Panics if `markup` itself does not parse; that is a bug in the test.
///
/// # Examples
///
/// ```ignore
/// let mut sig = Signature::new();
/// sig.add_default::<Greet>("greet");
/// let html = render_to_string(&mut sig, r#"<greet name="Ada"></greet>"#).await?;
/// assert_eq!(html, r#"<p data-sig-component="greet">Hello, Ada!</p>"#);
/// ```
pub async fn render_to_string(signature: &mut Signature, markup: &str) -> Result<String, Interrupted> {
    let mut dom = parse_body(markup).unwrap_or_else(|err| panic!("test markup does not parse: {err}"));
    signature.contact(&mut dom, "body").await?;
    Ok(body_html(&dom))
}

/// Parse `markup` as the content of a `<body>` root.
pub fn parse_body(markup: &str) -> Result<Dom, ParseError> {
    Dom::parse(markup)
}

/// Serialized content of the tree's root.
pub fn body_html(dom: &Dom) -> String {
    dom.root().map(|root| dom.inner_html(root)).unwrap_or_default()
}

/// Collapse whitespace runs between tags so indented fixtures compare equal
/// to compact output.
pub fn normalize_whitespace(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pending_space = false;
    for ch in html.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            let prev_is_tag_end = out.ends_with('>');
            if !out.is_empty() && !prev_is_tag_end && ch != '<' {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_between_tags() {
        let html = "<ul>\n  <li>a  b</li>\n  <li>c</li>\n</ul>\n";
        assert_eq!(normalize_whitespace(html), "<ul><li>a b</li><li>c</li></ul>");
    }

    #[test]
    fn body_html_of_empty_tree() {
        assert_eq!(body_html(&Dom::new()), "");
    }

    #[tokio::test]
    async fn renders_plain_markup_unchanged() {
        let mut sig = Signature::new();
        let html = render_to_string(&mut sig, "<p class=\"x\">hi</p><hr>").await.unwrap();
        assert_eq!(html, "<p class=\"x\">hi</p><hr>");
    }
}
