//! Markup engine: two-mode logos tokenizer, lenient tree-building parser,
//! character reference decoding.

pub mod entities;
pub mod parser;
pub mod tokenizer;

pub use parser::{parse_fragment, parse_into, ParseError};
