//! Plugins: named objects assembled once and shared read-only with every
//! component instance.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A bag of named values produced by a module or a plugin definition.
pub type Namespace = IndexMap<String, Rc<dyn Any>>;

/// Builds one module namespace.
pub type ModuleFn = fn() -> Namespace;

/// A plugin: optional helper modules plus a definition built from them.
pub trait Plugin {
    /// Modules the plugin needs. They are built before [`Plugin::define`] runs.
    fn modules(&self) -> Vec<(&'static str, ModuleFn)> {
        Vec::new()
    }

    /// Build the namespace installed under the plugin's name.
    fn define(&self, modules: &IndexMap<String, Namespace>) -> Namespace;
}

/// Assemble a plugin: build its modules, then its definition.
pub fn assemble(plugin: &dyn Plugin) -> Namespace {
    let modules: IndexMap<String, Namespace> = plugin
        .modules()
        .into_iter()
        .map(|(name, build)| (name.to_owned(), build()))
        .collect();
    plugin.define(&modules)
}

/// Frozen view of every installed plugin.
///
/// Cloning is cheap. Installing a new plugin on the engine never changes a
/// `Plugins` value that was already handed out.
#[derive(Clone, Default)]
pub struct Plugins {
    inner: Rc<IndexMap<String, Rc<Namespace>>>,
}

impl Plugins {
    /// A copy of this view with `namespace` installed under `name`.
    pub(crate) fn with(&self, name: impl Into<String>, namespace: Namespace) -> Self {
        let mut map = (*self.inner).clone();
        let name = name.into();
        if map.contains_key(&name) {
            log::warn!("plugin '{name}' already installed; replacing it");
        }
        map.insert(name, Rc::new(namespace));
        Self { inner: Rc::new(map) }
    }

    /// The namespace installed under `name`.
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.inner.get(name).map(|ns| ns.as_ref())
    }

    /// A typed value `key` from plugin `name`.
    pub fn value<T: Any>(&self, name: &str, key: &str) -> Option<&T> {
        self.get(name)?.get(key)?.downcast_ref::<T>()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Plugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.iter().map(|(k, ns)| (k, ns.keys().collect::<Vec<_>>())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Formatter;

    fn currency() -> Namespace {
        let mut ns = Namespace::new();
        ns.insert("symbol".into(), Rc::new("€".to_owned()));
        ns
    }

    impl Plugin for Formatter {
        fn modules(&self) -> Vec<(&'static str, ModuleFn)> {
            vec![("currency", currency)]
        }

        fn define(&self, modules: &IndexMap<String, Namespace>) -> Namespace {
            let symbol = modules["currency"]["symbol"]
                .downcast_ref::<String>()
                .cloned()
                .unwrap_or_default();
            let mut ns = Namespace::new();
            ns.insert("prefix".into(), Rc::new(format!("{symbol} ")));
            ns.insert("precision".into(), Rc::new(2_usize));
            ns
        }
    }

    #[test]
    fn assemble_builds_modules_first() {
        let ns = assemble(&Formatter);
        assert_eq!(ns["prefix"].downcast_ref::<String>().unwrap(), "€ ");
    }

    #[test]
    fn typed_lookup() {
        let plugins = Plugins::default().with("fmt", assemble(&Formatter));
        assert_eq!(plugins.value::<usize>("fmt", "precision"), Some(&2));
        assert_eq!(plugins.value::<String>("fmt", "precision"), None);
        assert!(plugins.value::<usize>("nope", "precision").is_none());
        assert_eq!(plugins.names().collect::<Vec<_>>(), vec!["fmt"]);
    }

    #[test]
    fn handed_out_views_are_frozen() {
        let before = Plugins::default();
        let after = before.with("fmt", assemble(&Formatter));
        assert!(before.is_empty());
        assert_eq!(after.len(), 1);
        assert!(after.contains("fmt"));
    }
}
