//! Component system: trait, props, coercion, registry, plugins.

pub mod traits;
pub mod value;
pub mod prop;
pub mod coerce;
pub mod library;
pub mod plugin;

pub use traits::{BoxError, Component, Context, Hook, Options, Render, RenderFuture};
pub use value::{Data, Value};
pub use prop::{Prop, PropType};
pub use coerce::{coerce, parse_props};
pub use library::{Factory, Library, Registration};
pub use plugin::{assemble, ModuleFn, Namespace, Plugin, Plugins};
