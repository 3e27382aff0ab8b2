//! A mounted (or mounting) component together with its engine-owned state.

use std::fmt;

use crate::component::{Component, Context, Data, Plugins};

/// One occurrence of a registered tag.
pub struct Instance {
    pub name: String,
    /// Captured inner markup of the original tag.
    pub content: String,
    pub data: Data,
    pub groups: Vec<String>,
    pub reference: Option<String>,
    pub plugins: Plugins,
    pub component: Box<dyn Component>,
}

impl Instance {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        groups: Vec<String>,
        plugins: Plugins,
        component: Box<dyn Component>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            data: Data::new(),
            groups,
            reference: None,
            plugins,
            component,
        }
    }

    /// The component alongside a context borrowing the rest of the instance.
    pub fn parts(&mut self) -> (&mut dyn Component, Context<'_>) {
        let cx = Context {
            name: &self.name,
            content: &self.content,
            data: &self.data,
            reference: self.reference.as_deref(),
            groups: &self.groups,
            plugins: &self.plugins,
        };
        (self.component.as_mut(), cx)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("content", &self.content)
            .field("data", &self.data)
            .field("groups", &self.groups)
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}
