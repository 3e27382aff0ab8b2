//! Component registry: tag name to factory, in registration order.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::traits::Component;

/// Builds a fresh component instance.
pub type Factory = Rc<dyn Fn() -> Box<dyn Component>>;

/// One registered tag.
#[derive(Clone)]
pub struct Registration {
    pub factory: Factory,
    /// Classification written to `data-sig-groups` on the mounted root.
    pub groups: Vec<String>,
}

impl Registration {
    pub fn instantiate(&self) -> Box<dyn Component> {
        (self.factory)()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

/// A named collection of components.
///
/// Tag names are stored lowercased, matching how the parser normalizes tags.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: IndexMap<String, Registration>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. A duplicate replaces the earlier entry but keeps its
    /// position in resolution order.
    pub fn register<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + 'static,
    {
        self.register_grouped(name, &[], factory)
    }

    pub fn register_grouped<F>(&mut self, name: &str, groups: &[&str], factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + 'static,
    {
        self.insert(
            name,
            Registration {
                factory: Rc::new(factory),
                groups: groups.iter().map(|g| (*g).to_owned()).collect(),
            },
        );
        self
    }

    /// Register a component type built with `Default`.
    pub fn register_default<C: Component + Default>(&mut self, name: &str) -> &mut Self {
        self.register(name, || Box::new(C::default()))
    }

    fn insert(&mut self, name: &str, registration: Registration) {
        let key = name.to_ascii_lowercase();
        if self.entries.contains_key(&key) {
            log::warn!("component '{key}' is already registered; overwriting");
        }
        self.entries.insert(key, registration);
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// Registrations in resolution order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &Registration)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Append every entry of `other`, in its order.
    pub fn merge(&mut self, other: &Library) {
        for (name, registration) in &other.entries {
            self.insert(name, registration.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
