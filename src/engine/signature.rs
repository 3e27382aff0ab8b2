//! The engine: registered components, plugins, template cache and refs, plus
//! the entry points that drive resolution passes.

use super::config::EngineConfig;
use super::refs::{unknown_ref, RefRegistry};
use super::resolve::Resolver;
use crate::component::plugin::assemble;
use crate::component::{Component, Library, Plugin, Plugins, Value};
use crate::dom::{Dom, NodeId};
use crate::error::{Error, ErrorSink, Interrupted, LogSink};
use crate::template::TemplateCache;

/// A component engine.
///
/// Every entry point takes `&mut self`, so two passes can never overlap on
/// one engine.
pub struct Signature {
    library: Library,
    plugins: Plugins,
    config: EngineConfig,
    cache: TemplateCache,
    refs: RefRegistry,
    sink: Box<dyn ErrorSink>,
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl Signature {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            library: Library::new(),
            plugins: Plugins::default(),
            config,
            cache: TemplateCache::new(),
            refs: RefRegistry::new(),
            sink: Box::new(LogSink),
        }
    }

    // -- registration -------------------------------------------------------

    /// Register a component under `name`.
    pub fn add<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + 'static,
    {
        self.library.register(name, factory);
        self
    }

    /// Register a component with groups written to its mounted root.
    pub fn add_grouped<F>(&mut self, name: &str, groups: &[&str], factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + 'static,
    {
        self.library.register_grouped(name, groups, factory);
        self
    }

    /// Register a `Default` component type under `name`.
    pub fn add_default<C: Component + Default>(&mut self, name: &str) -> &mut Self {
        self.library.register_default::<C>(name);
        self
    }

    /// Merge every component of `library`, in its order.
    pub fn add_library(&mut self, library: &Library) -> &mut Self {
        self.library.merge(library);
        self
    }

    /// Assemble `plugin` and make it available to components created from now on.
    pub fn install(&mut self, name: &str, plugin: &dyn Plugin) -> &mut Self {
        self.plugins = self.plugins.with(name, assemble(plugin));
        self
    }

    /// Replace the error sink.
    pub fn set_sink(&mut self, sink: impl ErrorSink + 'static) -> &mut Self {
        self.sink = Box::new(sink);
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    pub fn refs(&self) -> &RefRegistry {
        &self.refs
    }

    fn resolver(&mut self) -> Resolver<'_> {
        Resolver {
            library: &self.library,
            plugins: &self.plugins,
            config: &self.config,
            cache: &mut self.cache,
            refs: &mut self.refs,
        }
    }

    // -- passes -------------------------------------------------------------

    /// Resolve every registered tag below the element matched by `selector`.
    ///
    /// The element's children are resolved on a detached copy. On success the
    /// copy replaces them; on failure the element is left untouched, the error
    /// goes to the sink and `Interrupted` is returned.
    pub async fn contact(&mut self, dom: &mut Dom, selector: &str) -> Result<(), Interrupted> {
        let result = self.contact_inner(dom, selector).await;
        self.finish(result)
    }

    /// Like [`Signature::contact`], calling `on_complete` after a successful pass.
    pub async fn contact_with<F>(
        &mut self,
        dom: &mut Dom,
        selector: &str,
        on_complete: F,
    ) -> Result<(), Interrupted>
    where
        F: FnOnce(&Dom),
    {
        self.contact(dom, selector).await?;
        on_complete(dom);
        Ok(())
    }

    async fn contact_inner(&mut self, dom: &mut Dom, selector: &str) -> Result<(), Error> {
        let target = dom
            .query_selector(selector)
            .ok_or_else(|| Error::ElementNotFound {
                selector: selector.to_owned(),
            })?;

        let working = dom.create_fragment();
        for child in dom.children(target).to_vec() {
            if let Some(copy) = dom.clone_subtree(child) {
                dom.reparent(copy, working);
            }
        }

        log::debug!(
            "resolving '{selector}' with {} registered component(s)",
            self.library.len()
        );
        let result = self.resolver().resolve(dom, working, 0).await;
        match result {
            Ok(()) => {
                dom.clear_children(target);
                dom.move_children(working, target);
                dom.remove(working);
                log::debug!("resolved '{selector}'");
                Ok(())
            }
            Err(err) => {
                dom.remove(working);
                Err(err)
            }
        }
    }

    /// Re-render the instance registered as `name` in place.
    ///
    /// The same instance renders again; its new root takes the old root's
    /// position and keeps its ref and marker attributes.
    pub async fn update(&mut self, dom: &mut Dom, name: &str) -> Result<(), Interrupted> {
        let result = self.update_inner(dom, name).await;
        self.finish(result)
    }

    async fn update_inner(&mut self, dom: &mut Dom, name: &str) -> Result<(), Error> {
        let (index, mut entry) = self.refs.take(name).ok_or_else(|| unknown_ref(name))?;
        let result = if dom.contains(entry.node) {
            self.resolver().rerender(dom, &mut entry).await
        } else {
            Err(Error::Unknown {
                err: format!("ref '{name}' is no longer mounted"),
            })
        };
        self.refs.restore(index, name, entry)?;
        result
    }

    fn finish(&self, result: Result<(), Error>) -> Result<(), Interrupted> {
        result.map_err(|cause| {
            self.sink.report(&cause);
            Interrupted { cause }
        })
    }

    // -- refs ---------------------------------------------------------------

    /// Call the contact hook of the instance registered as `name`.
    ///
    /// An unknown name is reported to the sink before it is returned, like
    /// every other engine failure.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, Error> {
        self.refs
            .invoke(name, args)
            .inspect_err(|err| self.sink.report(err))
    }

    /// Node currently holding the root of `name`.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.refs.lookup(name)
    }

    /// The component registered as `name`, if it is a `T`.
    pub fn with_ref<T: Component>(&self, name: &str) -> Option<&T> {
        self.refs
            .get(name)?
            .instance
            .component
            .as_any()
            .downcast_ref::<T>()
    }

    /// Mutable access to the component registered as `name`, if it is a `T`.
    pub fn with_ref_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.refs
            .get_mut(name)?
            .instance
            .component
            .as_any_mut()
            .downcast_mut::<T>()
    }
}
