//! Templates: render results built from static segments plus dynamic slots,
//! and the shape-keyed cache that materializes them.

pub mod cache;
pub mod html;

pub use cache::TemplateCache;
pub use html::{unsafe_html, Slot, Template};
