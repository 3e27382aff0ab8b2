//! html! macro: split a template literal at `{}` placeholders and build a
//! `Template` whose argument count is checked at compile time.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Error, Expr, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// `"markup with {} holes", arg, arg, ...`
#[derive(Debug)]
struct HtmlInput {
    template: LitStr,
    args: Vec<Expr>,
}

impl Parse for HtmlInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let template: LitStr = input.parse()?;
        let mut args = Vec::new();
        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            args.push(input.parse()?);
        }
        Ok(HtmlInput { template, args })
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split `template` into the static segments around each `{}`.
///
/// `{{` and `}}` stand for literal braces. Any other brace is an error.
pub(crate) fn split_template(template: &str) -> std::result::Result<Vec<String>, String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('{', Some('{')) | ('}', Some('}')) => {
                chars.next();
                current.push(ch);
            }
            ('{', Some('}')) => {
                chars.next();
                segments.push(std::mem::take(&mut current));
            }
            ('{', _) => return Err("unmatched `{` in template; write `{{` for a literal brace".into()),
            ('}', _) => return Err("unmatched `}` in template; write `}}` for a literal brace".into()),
            _ => current.push(ch),
        }
    }
    segments.push(current);
    Ok(segments)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn html_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: HtmlInput = syn::parse2(input)?;
    let span = parsed.template.span();
    let segments =
        split_template(&parsed.template.value()).map_err(|msg| Error::new(span, msg))?;

    let holes = segments.len() - 1;
    if holes != parsed.args.len() {
        return Err(Error::new(
            span,
            format!(
                "template has {holes} placeholder(s) but {} argument(s) were given",
                parsed.args.len()
            ),
        ));
    }

    let args = &parsed.args;
    Ok(quote! {
        ::signature_ui::template::Template::new(
            &[#(#segments),*],
            ::std::vec![#(::signature_ui::template::Slot::from(#args)),*],
        )
    })
}

// ===========================================================================
// Tests
// ===========================================================================
