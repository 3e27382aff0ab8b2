//! Component trait: prop declarations, render, lifecycle hooks.
//!
//! A `Component` is the author-facing half of a mounted tag. The engine owns
//! everything else about an occurrence (captured content, coerced data, ref,
//! plugins) and lends it to each hook through a [`Context`]. Hooks default to
//! no-ops, so a component only implements the ones it cares about.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use super::plugin::Plugins;
use super::prop::Prop;
use super::value::{Data, Value};
use crate::dom::{Dom, NodeId};
use crate::template::Template;

/// Error type a deferred render may fail with.
pub type BoxError = Box<dyn std::error::Error>;

/// A render that completes later.
pub type RenderFuture = Pin<Box<dyn Future<Output = Result<Template, BoxError>>>>;

/// What [`Component::render`] produces.
pub enum Render {
    /// Markup available immediately.
    Ready(Template),
    /// Markup computed asynchronously; awaited by the engine.
    Deferred(RenderFuture),
}

impl Render {
    /// Wrap a future as a deferred render.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<Template, BoxError>> + 'static,
    {
        Render::Deferred(Box::pin(future))
    }
}

impl From<Template> for Render {
    fn from(template: Template) -> Self {
        Render::Ready(template)
    }
}

impl fmt::Debug for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Render::Ready(t) => f.debug_tuple("Ready").field(t).finish(),
            Render::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Allocate a ref even when the tag does not ask for one.
    pub generate_ref_if_not_specified: bool,
}

/// The fixed hook set, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Init,
    PropParsed,
    PropsParsed,
    Render,
    Mount,
    Contact,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hook::Init => "onInit",
            Hook::PropParsed => "onPropParsed",
            Hook::PropsParsed => "onPropsParsed",
            Hook::Render => "onRender",
            Hook::Mount => "onMount",
            Hook::Contact => "onContact",
        })
    }
}

/// Engine-owned state of an occurrence, lent to hooks.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The tag this component is registered under.
    pub name: &'a str,
    /// Inner markup of the original tag.
    pub content: &'a str,
    /// Coerced props. Empty during `on_init`.
    pub data: &'a Data,
    /// Ref name, once registered.
    pub reference: Option<&'a str>,
    /// Tag-level groups from registration.
    pub groups: &'a [String],
    /// Installed plugins (read-only).
    pub plugins: &'a Plugins,
}

/// Core trait implemented by every component.
///
/// Object-safe: the engine stores instances as `Box<dyn Component>`.
pub trait Component: Any {
    /// Declared props, in declaration order. Names are matched against
    /// attributes case-insensitively.
    fn props(&self) -> Vec<(&'static str, Prop)> {
        Vec::new()
    }

    /// Behavior flags.
    fn options(&self) -> Options {
        Options::default()
    }

    /// Produce markup. Must normalize to exactly one root element.
    fn render(&mut self, cx: &Context<'_>) -> Render;

    /// Called after instantiation, before props are parsed.
    fn on_init(&mut self, _cx: &Context<'_>) {}

    /// Called once per successfully coerced prop.
    fn on_prop_parsed(&mut self, _name: &str, _prop: &Prop, _value: &Value) {}

    /// Called once after all props are coerced.
    fn on_props_parsed(&mut self, _data: &Data) {}

    /// Called after the rendered fragment is resolved and validated.
    fn on_render(&mut self, _cx: &Context<'_>) {}

    /// Called once the root is spliced into the tree.
    fn on_mount(&mut self, _cx: &Context<'_>, _dom: &Dom, _node: NodeId) {}

    /// Imperative entry point, reached through a ref.
    fn on_contact(&mut self, _args: &[Value]) -> Option<Value> {
        None
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Label {
        inits: usize,
    }

    impl Component for Label {
        fn render(&mut self, cx: &Context<'_>) -> Render {
            Template::new(&["<span>", "</span>"], vec![cx.content.into()]).into()
        }

        fn on_init(&mut self, _cx: &Context<'_>) {
            self.inits += 1;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn context<'a>(data: &'a Data, plugins: &'a Plugins) -> Context<'a> {
        Context {
            name: "label",
            content: "hi",
            data,
            reference: None,
            groups: &[],
            plugins,
        }
    }

    #[test]
    fn defaults() {
        let label = Label::default();
        assert!(label.props().is_empty());
        assert_eq!(label.options(), Options::default());
        assert!(!label.options().generate_ref_if_not_specified);
    }

    #[test]
    fn render_ready() {
        let (data, plugins) = (Data::new(), Plugins::default());
        let mut label = Label::default();
        match label.render(&context(&data, &plugins)) {
            Render::Ready(t) => assert_eq!(t.values().len(), 1),
            Render::Deferred(_) => panic!("expected ready render"),
        }
    }

    #[test]
    fn default_contact_is_none() {
        let mut label = Label::default();
        assert_eq!(label.on_contact(&[Value::Null]), None);
    }

    #[test]
    fn object_safe_and_downcastable() {
        let (data, plugins) = (Data::new(), Plugins::default());
        let mut boxed: Box<dyn Component> = Box::new(Label::default());
        boxed.on_init(&context(&data, &plugins));
        let label = boxed.as_any().downcast_ref::<Label>().unwrap();
        assert_eq!(label.inits, 1);
        boxed.as_any_mut().downcast_mut::<Label>().unwrap().inits = 5;
        assert_eq!(boxed.as_any().downcast_ref::<Label>().unwrap().inits, 5);
    }

    #[test]
    fn deferred_render_debug() {
        let render = Render::deferred(async { Ok::<_, BoxError>(Template::fixed(&["<p></p>"])) });
        assert_eq!(format!("{render:?}"), "Deferred(..)");
    }

    #[test]
    fn deferred_render_resolves() {
        let render = Render::deferred(async { Ok::<_, BoxError>(Template::fixed(&["<p></p>"])) });
        let Render::Deferred(future) = render else {
            panic!("expected deferred render");
        };
        let template = tokio_test::block_on(future).unwrap();
        assert_eq!(template.strings(), &["<p></p>"]);
    }

    #[test]
    fn hook_names() {
        assert_eq!(Hook::Init.to_string(), "onInit");
        assert_eq!(Hook::Mount.to_string(), "onMount");
    }
}
