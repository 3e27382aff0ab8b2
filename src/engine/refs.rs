//! Ref registry: named handles to mounted instances.
//!
//! Names are unique for the lifetime of the engine. Each entry keeps the
//! instance alive together with the node currently holding its root, so the
//! component can be invoked or re-rendered later.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use indexmap::IndexMap;

use super::instance::Instance;
use crate::component::{Hook, Value};
use crate::dom::NodeId;
use crate::error::Error;

/// A registered instance and its mounted root.
#[derive(Debug)]
pub struct RefEntry {
    pub instance: Instance,
    pub node: NodeId,
}

/// Ref name to entry, in registration order.
#[derive(Debug, Default)]
pub struct RefRegistry {
    entries: IndexMap<String, RefEntry>,
    counter: u64,
    seed: RandomState,
}

impl RefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `ref-collision` if `name` is taken.
    pub fn ensure_free(&self, name: &str, component: &str) -> Result<(), Error> {
        if self.entries.contains_key(name) {
            return Err(Error::RefCollision {
                reference: name.to_owned(),
                component: component.to_owned(),
            });
        }
        Ok(())
    }

    /// Store `instance` under `name`.
    pub fn register(&mut self, name: impl Into<String>, instance: Instance, node: NodeId) -> Result<(), Error> {
        let name = name.into();
        self.ensure_free(&name, &instance.name)?;
        log::debug!("ref '{name}' -> <{}>", instance.name);
        self.entries.insert(name, RefEntry { instance, node });
        Ok(())
    }

    /// The node currently holding the root of `name`.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).map(|entry| entry.node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RefEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RefEntry> {
        self.entries.get_mut(name)
    }

    /// Call the component's contact hook.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, Error> {
        let entry = self.entries.get_mut(name).ok_or_else(|| unknown_ref(name))?;
        log::trace!("<{}> {}", entry.instance.name, Hook::Contact);
        Ok(entry.instance.component.on_contact(args))
    }

    /// A fresh `{prefix}-{counter}-{suffix}` name not yet registered.
    pub fn generate_name(&mut self, prefix: &str) -> String {
        loop {
            self.counter += 1;
            let mut hasher = self.seed.build_hasher();
            hasher.write_u64(self.counter);
            let name = format!("{prefix}-{}-{:08x}", self.counter, hasher.finish() as u32);
            if !self.entries.contains_key(&name) {
                return name;
            }
        }
    }

    /// Remove `name` for re-rendering, remembering its position.
    pub(crate) fn take(&mut self, name: &str) -> Option<(usize, RefEntry)> {
        let (index, _, entry) = self.entries.shift_remove_full(name)?;
        Some((index, entry))
    }

    /// Put an entry removed with [`RefRegistry::take`] back in place.
    pub(crate) fn restore(&mut self, index: usize, name: &str, entry: RefEntry) -> Result<(), Error> {
        self.ensure_free(name, &entry.instance.name)?;
        let index = index.min(self.entries.len());
        self.entries.shift_insert(index, name.to_owned(), entry);
        Ok(())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn unknown_ref(name: &str) -> Error {
    Error::Unknown {
        err: format!("no ref named '{name}'"),
    }
}
