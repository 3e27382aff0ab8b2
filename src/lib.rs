//! # signature-ui
//!
//! A declarative component engine for markup trees.
//!
//! Authors write custom tags inside ordinary markup. A [`Signature`] engine
//! finds every registered tag below a root, instantiates its component,
//! coerces the tag's attributes into typed props, renders the component to a
//! template and splices the single root element it produces back into the
//! tree. Components may render other components; nested tags are resolved
//! before the parent is spliced in.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: slotmap-backed markup tree with queries and serialization
//! - **[`markup`]**: logos tokenizer and lenient fragment parser
//! - **[`template`]**: templates and the shape-keyed skeleton cache
//! - **[`component`]**: the component trait, props, coercion, registry, plugins
//! - **[`engine`]**: the resolution walk, refs and entry points
//! - **[`error`]**: the failure taxonomy and reporting sink
//! - **[`logging`]**: `env_logger` setup for the `log` output
//! - **[`testing`]**: headless driver and snapshot helpers
//!
//! ## Example
//!
//! ```ignore
//! use std::any::Any;
//! use signature_ui::prelude::*;
//!
//! #[derive(Default)]
//! struct Greet;
//!
//! impl Component for Greet {
//!     fn props(&self) -> Vec<(&'static str, Prop)> {
//!         vec![("name", Prop::string())]
//!     }
//!
//!     fn render(&mut self, cx: &Context<'_>) -> Render {
//!         Template::new(&["<p>Hello, ", "!</p>"], vec![cx.data.str("name").unwrap_or_default().into()]).into()
//!     }
//!
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! let mut dom = Dom::parse(r#"<div id="app"><greet name="Ada"></greet></div>"#)?;
//! let mut sig = Signature::new();
//! sig.add_default::<Greet>("greet");
//! sig.contact(&mut dom, "#app").await?;
//! ```

// Host tree
pub mod dom;
pub mod markup;

// Rendering
pub mod template;
pub mod component;
pub mod engine;

// Ambient
pub mod error;
pub mod logging;
pub mod testing;

pub use component::{Component, Context, Prop, PropType, Render, Value};
pub use dom::Dom;
pub use engine::{EngineConfig, Signature};
pub use error::{Error, Interrupted};
pub use template::{unsafe_html, Template};

/// Everything a component author usually needs.
pub mod prelude {
    pub use crate::component::{
        Component, Context, Data, Library, Options, Plugin, Plugins, Prop, PropType, Render,
        Value,
    };
    pub use crate::dom::Dom;
    pub use crate::engine::{EngineConfig, Signature};
    pub use crate::error::{Error, ErrorSink, Interrupted};
    pub use crate::template::{unsafe_html, Slot, Template};
}

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use signature_ui_macros::html;
