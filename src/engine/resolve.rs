//! The recursive resolution walk.
//!
//! Given a frame (a detached fragment or any subtree), every occurrence of a
//! registered tag below it is replaced by the root of its rendered output.
//! Tags are visited in registration order; occurrences of one tag in document
//! order. Rendered output is resolved recursively before it is spliced in, so
//! when a tag has been processed nothing below the frame still carries it.
//!
//! The walk stops at the first failure and leaves the frame as it is at that
//! point. Callers that need all-or-nothing behavior run it on a copy.

use std::future::Future;
use std::pin::Pin;

use super::config::EngineConfig;
use super::instance::Instance;
use super::refs::{RefEntry, RefRegistry};
use crate::component::{parse_props, Hook, Library, Plugins, Registration, Render};
use crate::dom::{Dom, Element, NodeData, NodeId};
use crate::error::Error;
use crate::template::TemplateCache;

/// Marker attribute naming the component that produced a root.
pub const COMPONENT_ATTR: &str = "data-sig-component";
/// Marker attribute listing the component's groups.
pub const GROUPS_ATTR: &str = "data-sig-groups";
/// Attribute requesting (and later exposing) a ref name.
pub const REF_ATTR: &str = "ref";

type Pass<'s> = Pin<Box<dyn Future<Output = Result<(), Error>> + 's>>;

/// Everything one pass needs, borrowed from the engine.
pub(crate) struct Resolver<'a> {
    pub library: &'a Library,
    pub plugins: &'a Plugins,
    pub config: &'a EngineConfig,
    pub cache: &'a mut TemplateCache,
    pub refs: &'a mut RefRegistry,
}

impl Resolver<'_> {
    /// Resolve every registered tag below `frame`.
    pub fn resolve<'s>(&'s mut self, dom: &'s mut Dom, frame: NodeId, depth: usize) -> Pass<'s> {
        Box::pin(async move {
            if depth > self.config.max_depth {
                return Err(Error::StackOverflow {
                    err: format!("recursion depth exceeded ({})", self.config.max_depth),
                });
            }

            let library = self.library;
            for (tag, registration) in library.list() {
                for occurrence in dom.query_by_tag_within(frame, tag) {
                    // An earlier replacement may have removed it.
                    if !dom.is_descendant_of(occurrence, frame) {
                        continue;
                    }
                    self.mount(dom, occurrence, tag, registration, depth).await?;
                }
            }
            Ok(())
        })
    }

    async fn mount(
        &mut self,
        dom: &mut Dom,
        occurrence: NodeId,
        tag: &str,
        registration: &Registration,
        depth: usize,
    ) -> Result<(), Error> {
        let Some(element) = dom.element(occurrence).cloned() else {
            return Ok(());
        };
        let content = dom.inner_html(occurrence);
        let content = if self.config.trim_content {
            content.trim().to_owned()
        } else {
            content
        };

        let mut instance = Instance::new(
            tag,
            content,
            registration.groups.clone(),
            self.plugins.clone(),
            registration.instantiate(),
        );

        log::trace!("<{tag}> {}", Hook::Init);
        {
            let (component, cx) = instance.parts();
            component.on_init(&cx);
        }

        log::trace!("<{tag}> {}", Hook::PropsParsed);
        instance.data = parse_props(tag, instance.component.as_mut(), &element)?;

        let root = self.render_root(dom, &mut instance, depth).await?;

        if let Err(err) = self.allocate_ref(&mut instance, &element) {
            dom.remove(root);
            return Err(err);
        }

        let declared: Vec<String> = instance
            .component
            .props()
            .into_iter()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        if let Some(el) = dom.element_mut(root) {
            mark_root(el, tag, &instance.groups, instance.reference.as_deref());
            copy_passthrough(el, &element, &declared);
        }

        dom.replace(occurrence, root);

        log::trace!("<{tag}> {}", Hook::Mount);
        {
            let (component, cx) = instance.parts();
            component.on_mount(&cx, dom, root);
        }

        if let Some(name) = instance.reference.clone() {
            self.refs.register(name, instance, root)?;
        }
        Ok(())
    }

    /// Render `instance` into a single detached root element, fully resolved.
    ///
    /// Runs render, awaits a deferred result, instantiates the template,
    /// resolves nested components and validates the single root before
    /// firing `on_render`.
    pub async fn render_root(
        &mut self,
        dom: &mut Dom,
        instance: &mut Instance,
        depth: usize,
    ) -> Result<NodeId, Error> {
        let tag = instance.name.clone();

        log::trace!("<{tag}> render");
        let render = {
            let (component, cx) = instance.parts();
            component.render(&cx)
        };
        let template = match render {
            Render::Ready(template) => template,
            Render::Deferred(future) => future.await.map_err(|err| Error::RenderAsyncFailed {
                component: tag.clone(),
                err: err.to_string(),
            })?,
        };

        let fragment = self
            .cache
            .instantiate(&template, dom)
            .map_err(|err| Error::UnknownFrom {
                from: tag.clone(),
                err: err.to_string(),
            })?;

        if let Err(err) = self.resolve(dom, fragment, depth + 1).await {
            dom.remove(fragment);
            return Err(err);
        }

        let Some(root) = single_root(dom, fragment) else {
            let elements = dom.inner_html(fragment).trim().to_owned();
            dom.remove(fragment);
            return Err(Error::MultipleRootElements {
                component: tag,
                elements,
            });
        };
        dom.detach(root);
        dom.remove(fragment);

        log::trace!("<{tag}> {}", Hook::Render);
        let (component, cx) = instance.parts();
        component.on_render(&cx);
        Ok(root)
    }

    fn allocate_ref(&mut self, instance: &mut Instance, element: &Element) -> Result<(), Error> {
        let name = match element.attr(REF_ATTR) {
            Some("") => self.refs.generate_name(&self.config.ref_prefix),
            Some(name) => name.to_owned(),
            None if instance.component.options().generate_ref_if_not_specified => {
                self.refs.generate_name(&self.config.ref_prefix)
            }
            None => return Ok(()),
        };
        self.refs.ensure_free(&name, &instance.name)?;
        instance.reference = Some(name);
        Ok(())
    }

    /// Re-render a registered instance in place, keeping its ref.
    pub async fn rerender(&mut self, dom: &mut Dom, entry: &mut RefEntry) -> Result<(), Error> {
        let old = entry.node;
        let markers: Vec<(String, String)> = dom
            .element(old)
            .map(|el| {
                [COMPONENT_ATTR, GROUPS_ATTR, REF_ATTR]
                    .iter()
                    .filter_map(|name| el.attr(name).map(|v| ((*name).to_owned(), v.to_owned())))
                    .collect()
            })
            .unwrap_or_default();

        let root = self.render_root(dom, &mut entry.instance, 0).await?;
        if let Some(el) = dom.element_mut(root) {
            for (name, value) in markers {
                el.set_attr(name, value);
            }
        }
        dom.replace(old, root);
        entry.node = root;

        log::trace!("<{}> {}", entry.instance.name, Hook::Mount);
        let (component, cx) = entry.instance.parts();
        component.on_mount(&cx, dom, root);
        Ok(())
    }
}

/// The only element child of `fragment`, provided every other child is
/// whitespace text or a comment.
fn single_root(dom: &Dom, fragment: NodeId) -> Option<NodeId> {
    let mut root = None;
    for &child in dom.children(fragment) {
        match dom.get(child)? {
            NodeData::Element(_) if root.is_none() => root = Some(child),
            NodeData::Comment(_) => {}
            data if data.is_blank_text() => {}
            _ => return None,
        }
    }
    root
}

fn mark_root(el: &mut Element, tag: &str, groups: &[String], reference: Option<&str>) {
    el.set_attr(COMPONENT_ATTR, tag);
    if !groups.is_empty() {
        el.set_attr(GROUPS_ATTR, groups.join(" "));
    }
    if let Some(name) = reference {
        el.set_attr(REF_ATTR, name);
    }
}

/// Copy attributes of the original tag that are not props or markers, unless
/// the rendered root already sets them.
fn copy_passthrough(el: &mut Element, original: &Element, declared: &[String]) {
    for (name, value) in &original.attrs {
        let reserved = [REF_ATTR, COMPONENT_ATTR, GROUPS_ATTR].contains(&name.as_str());
        if reserved || declared.contains(name) || el.has_attr(name) {
            continue;
        }
        el.set_attr(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_root_ignores_blank_text_and_comments() {
        let mut dom = Dom::new();
        let frag = dom.create_fragment();
        crate::markup::parse_into(&mut dom, frag, "\n  <!-- c --><p>x</p>\n").unwrap();
        let root = single_root(&dom, frag).unwrap();
        assert!(dom.get(root).unwrap().is_tag("p"));
    }

    #[test]
    fn single_root_rejects_siblings_and_text() {
        for markup in ["<p></p><p></p>", "text <p></p>", "", "just text"] {
            let mut dom = Dom::new();
            let frag = dom.create_fragment();
            crate::markup::parse_into(&mut dom, frag, markup).unwrap();
            assert!(single_root(&dom, frag).is_none(), "{markup:?}");
        }
    }

    #[test]
    fn passthrough_skips_props_markers_and_existing() {
        let original = Element::new("greet")
            .with_attr("name", "Ada")
            .with_attr("class", "outer")
            .with_attr("id", "hello")
            .with_attr("ref", "g")
            .with_attr("title", "t");
        let mut root = Element::new("p").with_attr("class", "inner");
        copy_passthrough(&mut root, &original, &["name".to_owned()]);
        assert_eq!(root.attr("class"), Some("inner"));
        assert_eq!(root.attr("id"), Some("hello"));
        assert_eq!(root.attr("title"), Some("t"));
        assert!(!root.has_attr("name"));
        assert!(!root.has_attr("ref"));
    }

    #[test]
    fn markers_written_on_root() {
        let mut root = Element::new("div");
        mark_root(&mut root, "card", &["ui".into(), "layout".into()], Some("c1"));
        assert_eq!(root.attr(COMPONENT_ATTR), Some("card"));
        assert_eq!(root.attr(GROUPS_ATTR), Some("ui layout"));
        assert_eq!(root.attr(REF_ATTR), Some("c1"));

        let mut bare = Element::new("div");
        mark_root(&mut bare, "card", &[], None);
        assert!(!bare.has_attr(GROUPS_ATTR));
        assert!(!bare.has_attr(REF_ATTR));
    }
}
