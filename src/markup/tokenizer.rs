//! logos-based markup tokenizer.
//!
//! Markup is lexed in two modes. [`ContentToken`] covers everything between
//! tags; on a [`ContentToken::StartTag`] the parser morphs the lexer into
//! [`TagToken`] to read attributes, then morphs back after `>` or `/>`.
//!
//! Token priority in logos is longest match first, so:
//! - `<div` matches [`ContentToken::StartTag`], not `Lt` + `Text`
//! - `</div>` matches [`ContentToken::EndTag`]
//! - a lone `<` (e.g. `1 < 2`) falls through to [`ContentToken::Lt`]

use logos::{Lexer, Logos};

/// Tokens outside of a tag.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentToken {
    /// `<!-- ... -->`, body consumed by callback.
    #[token("<!--", lex_comment)]
    Comment,

    /// `<!DOCTYPE html>` and other declarations.
    #[regex(r"<![a-zA-Z][^>]*>")]
    Declaration,

    /// `</name>`, with optional whitespace before `>`.
    #[regex(r"</[a-zA-Z][^>]*>")]
    EndTag,

    /// `<name`; attributes follow in tag mode.
    #[regex(r"<[a-zA-Z][^ \t\n\r\f/>]*")]
    StartTag,

    /// A `<` that does not open a tag.
    #[token("<")]
    Lt,

    /// Character data.
    #[regex(r"[^<]+")]
    Text,
}

/// Tokens inside a start tag, after the tag name.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum TagToken {
    /// `>`
    #[token(">")]
    Close,

    /// `/>`
    #[token("/>")]
    SelfClose,

    /// `/` not followed by `>`.
    #[token("/")]
    Slash,

    /// `=`
    #[token("=")]
    Eq,

    /// `"..."`
    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    /// `'...'`
    #[regex(r"'[^']*'")]
    SingleQuoted,

    /// Attribute name or unquoted value.
    #[regex(r#"[^ \t\n\r\f"'<>=/]+"#)]
    Word,
}

/// Consume a comment body up to and including `-->`.
fn lex_comment(lex: &mut Lexer<ContentToken>) -> bool {
    match lex.remainder().find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            true
        }
        None => false,
    }
}

/// Tokenize content-mode markup into `(token, text)` pairs.
///
/// Only meaningful for input without tags in it; used by tests and diagnostics.
pub fn tokenize_content(input: &str) -> Vec<(ContentToken, String)> {
    ContentToken::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}

/// Tokenize the inside of a start tag into `(token, text)` pairs.
pub fn tokenize_tag(input: &str) -> Vec<(TagToken, String)> {
    TagToken::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(input: &str) -> Vec<ContentToken> {
        tokenize_content(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn text_and_lone_lt() {
        assert_eq!(
            tokenize_content("1 < 2"),
            vec![
                (ContentToken::Text, "1 ".into()),
                (ContentToken::Lt, "<".into()),
                (ContentToken::Text, " 2".into()),
            ]
        );
    }

    #[test]
    fn start_and_end_tags() {
        let result = tokenize_content("<greet></greet >");
        assert_eq!(result[0], (ContentToken::StartTag, "<greet".into()));
        assert_eq!(result[1], (ContentToken::Text, ">".into()));
        assert_eq!(result[2], (ContentToken::EndTag, "</greet >".into()));
    }

    #[test]
    fn comment_consumes_body() {
        assert_eq!(
            tokenize_content("<!-- a > b -->x"),
            vec![
                (ContentToken::Comment, "<!-- a > b -->".into()),
                (ContentToken::Text, "x".into()),
            ]
        );
    }

    #[test]
    fn unterminated_comment_is_error() {
        let mut lex = ContentToken::lexer("<!-- never closed");
        assert_eq!(lex.next(), Some(Err(())));
    }

    #[test]
    fn declaration() {
        assert_eq!(content("<!DOCTYPE html>"), vec![ContentToken::Declaration]);
    }

    #[test]
    fn tag_mode_tokens() {
        let result = tokenize_tag(r#" name="Ada" count='3' hidden flag=on />"#);
        assert_eq!(
            result,
            vec![
                (TagToken::Word, "name".into()),
                (TagToken::Eq, "=".into()),
                (TagToken::DoubleQuoted, "\"Ada\"".into()),
                (TagToken::Word, "count".into()),
                (TagToken::Eq, "=".into()),
                (TagToken::SingleQuoted, "'3'".into()),
                (TagToken::Word, "hidden".into()),
                (TagToken::Word, "flag".into()),
                (TagToken::Eq, "=".into()),
                (TagToken::Word, "on".into()),
                (TagToken::SelfClose, "/>".into()),
            ]
        );
    }

    #[test]
    fn slash_inside_unquoted_value() {
        let result: Vec<TagToken> = tokenize_tag("href=/a/b>").into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            result,
            vec![
                TagToken::Word,
                TagToken::Eq,
                TagToken::Slash,
                TagToken::Word,
                TagToken::Slash,
                TagToken::Word,
                TagToken::Close,
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(content("").is_empty());
        assert!(tokenize_tag("   ").is_empty());
    }
}
