//! Markup tree: slotmap-backed arena with selector queries and serialization.

pub mod node;
pub mod tree;
pub mod query;
pub mod serialize;

pub use node::{Element, NodeData, NodeId};
pub use query::Selector;
pub use tree::Dom;
