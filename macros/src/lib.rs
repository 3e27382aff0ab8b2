//! Proc macros for signature-ui: `html!` templates.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `signature-ui`.

use proc_macro::TokenStream;

mod html_macro;

/// Build a `Template` from a literal with `{}` placeholders.
///
/// Each `{}` becomes a slot filled by the matching argument through
/// `Slot::from`, so plain values are escaped and `unsafe_html(..)` is spliced
/// raw. `{{` and `}}` produce literal braces. The number of arguments must
/// match the number of placeholders.
///
/// # Example
///
/// ```ignore
/// let t = html!("<p class=\"{}\">Hello, {}!</p>", class, name);
/// ```
#[proc_macro]
pub fn html(input: TokenStream) -> TokenStream {
    html_macro::html_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
