//! Primitive DOM operations shared by every renderer

use std::cell::Cell;
use std::rc::Rc;

use fos_dom::{Handler, ListenerOptions, NodeId, PropertyValue};
use heck::ToKebabCase;

use super::{ListenTarget, RootSelector, StyleFlags};
use crate::error::{RenderError, Result, SyntheticKind};
use crate::events::{decorate_prevent_default, DetachFn, EventManager, TracingService};
use crate::DocumentRef;

/// Known namespace prefixes and their URIs
pub const NAMESPACE_URIS: &[(&str, &str)] = &[
    ("svg", "http://www.w3.org/2000/svg"),
    ("xhtml", "http://www.w3.org/1999/xhtml"),
    ("xlink", "http://www.w3.org/1999/xlink"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xmlns", "http://www.w3.org/2000/xmlns/"),
    ("math", "http://www.w3.org/1998/Math/MathML"),
];

/// URI for a namespace prefix
pub fn namespace_uri(prefix: &str) -> Option<&'static str> {
    NAMESPACE_URIS.iter().find(|(p, _)| *p == prefix).map(|(_, uri)| *uri)
}

/// The document-backed half of a renderer
pub struct BaseRenderer {
    document: DocumentRef,
    event_manager: Rc<EventManager>,
    tracing: Option<Rc<dyn TracingService>>,
    throw_on_synthetic_props: Cell<bool>,
}

impl BaseRenderer {
    pub fn new(
        document: DocumentRef,
        event_manager: Rc<EventManager>,
        tracing: Option<Rc<dyn TracingService>>,
    ) -> Self {
        Self {
            document,
            event_manager,
            tracing,
            throw_on_synthetic_props: Cell::new(true),
        }
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn set_throw_on_synthetic_props(&self, enabled: bool) {
        self.throw_on_synthetic_props.set(enabled);
    }

    pub fn create_element(&self, name: &str, namespace: Option<&str>) -> NodeId {
        let mut doc = self.document.borrow_mut();
        match namespace {
            Some(ns) => doc.create_element_ns(Some(namespace_uri(ns).unwrap_or(ns)), name),
            None => doc.create_element(name),
        }
    }

    pub fn create_comment(&self, value: &str) -> NodeId {
        self.document.borrow_mut().create_comment(value)
    }

    pub fn create_text(&self, value: &str) -> NodeId {
        self.document.borrow_mut().create_text(value)
    }

    /// Append, redirecting `<template>` parents to their content fragment
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut doc = self.document.borrow_mut();
        let target = doc.template_content(parent).unwrap_or(parent);
        doc.append_child(target, child)?;
        Ok(())
    }

    pub fn insert_before(
        &self,
        parent: Option<NodeId>,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        let Some(parent) = parent else { return Ok(()) };
        let mut doc = self.document.borrow_mut();
        let target = doc.template_content(parent).unwrap_or(parent);
        doc.insert_before(target, child, reference)?;
        Ok(())
    }

    /// Detach `child` from wherever it currently is
    pub fn remove_child(&self, child: NodeId) {
        self.document.borrow_mut().remove(child);
    }

    pub fn select_root_element(
        &self,
        selector: RootSelector<'_>,
        preserve_content: bool,
    ) -> Result<NodeId> {
        let mut doc = self.document.borrow_mut();
        let element = match selector {
            RootSelector::Selector(selector) => doc
                .query_selector(selector)?
                .ok_or_else(|| RenderError::RootNotFound(selector.to_string()))?,
            RootSelector::Node(node) => node,
        };
        if !preserve_content {
            doc.set_text_content(element, "");
        }
        Ok(element)
    }

    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.document.borrow().parent_node(node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.document.borrow().next_sibling(node)
    }

    pub fn set_attribute(&self, el: NodeId, name: &str, value: &str, namespace: Option<&str>) {
        let mut doc = self.document.borrow_mut();
        match namespace {
            Some(ns) => {
                let qualified = format!("{ns}:{name}");
                match namespace_uri(ns) {
                    Some(uri) => doc.set_attribute_ns(el, uri, &qualified, value),
                    None => doc.set_attribute(el, &qualified, value),
                }
            }
            None => doc.set_attribute(el, name, value),
        }
    }

    pub fn remove_attribute(&self, el: NodeId, name: &str, namespace: Option<&str>) {
        let mut doc = self.document.borrow_mut();
        match namespace {
            Some(ns) => match namespace_uri(ns) {
                Some(uri) => doc.remove_attribute_ns(el, uri, name),
                None => doc.remove_attribute(el, &format!("{ns}:{name}")),
            },
            None => doc.remove_attribute(el, name),
        }
    }

    pub fn add_class(&self, el: NodeId, name: &str) {
        self.document.borrow_mut().add_class(el, name);
    }

    pub fn remove_class(&self, el: NodeId, name: &str) {
        self.document.borrow_mut().remove_class(el, name);
    }

    /// Set an inline style. Without `DASH_CASE` the name is treated as a
    /// camelCase property and converted.
    pub fn set_style(&self, el: NodeId, style: &str, value: &str, flags: StyleFlags) {
        let important = flags.has(StyleFlags::IMPORTANT);
        let property = dash_case_property(style, flags);
        self.document.borrow_mut().set_style_property(el, &property, value, important);
    }

    pub fn remove_style(&self, el: NodeId, style: &str, flags: StyleFlags) {
        let property = dash_case_property(style, flags);
        self.document.borrow_mut().remove_style_property(el, &property);
    }

    pub fn set_property(&self, el: NodeId, name: &str, value: PropertyValue) -> Result<()> {
        self.check_no_synthetic(name, SyntheticKind::Property)?;
        self.document.borrow_mut().set_property(el, name, value);
        Ok(())
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.document.borrow_mut().set_node_value(node, value);
    }

    /// Register `handler` through the event manager.
    ///
    /// The handler is wrapped so `Some(false)` prevents the default action,
    /// then offered to the tracing service.
    pub fn listen(
        &self,
        target: ListenTarget<'_>,
        event_name: &str,
        handler: Handler,
        options: ListenerOptions,
    ) -> Result<DetachFn> {
        self.check_no_synthetic(event_name, SyntheticKind::Listener)?;
        let node = match target {
            ListenTarget::Node(node) => node,
            ListenTarget::Global(name) => self
                .document
                .borrow()
                .global_event_target(name)
                .ok_or_else(|| RenderError::UnsupportedEventTarget {
                    target: name.to_string(),
                    event: event_name.to_string(),
                })?,
        };

        let mut listener = decorate_prevent_default(handler);
        if let Some(tracing) = &self.tracing {
            listener = tracing.wrap_event_listener(node, event_name, listener);
        }
        self.event_manager.add_event_listener(node, event_name, listener, options)
    }

    fn check_no_synthetic(&self, name: &str, kind: SyntheticKind) -> Result<()> {
        if self.throw_on_synthetic_props.get() && name.starts_with('@') {
            return Err(RenderError::SyntheticProperty {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for BaseRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseRenderer")
            .field("tracing", &self.tracing.is_some())
            .field("throw_on_synthetic_props", &self.throw_on_synthetic_props.get())
            .finish()
    }
}

/// `backgroundColor` -> `background-color`; dash-case and custom
/// properties pass through
fn css_property_name(style: &str) -> String {
    if style.starts_with("--") || !style.chars().any(|c| c.is_ascii_uppercase()) {
        style.to_string()
    } else {
        style.to_kebab_case()
    }
}

fn dash_case_property(style: &str, flags: StyleFlags) -> String {
    if flags.has(StyleFlags::DASH_CASE) {
        style.to_string()
    } else {
        css_property_name(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_lookup() {
        assert_eq!(namespace_uri("svg"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(namespace_uri("math"), Some("http://www.w3.org/1998/Math/MathML"));
        assert_eq!(namespace_uri("custom"), None);
    }

    #[test]
    fn test_css_property_name() {
        assert_eq!(css_property_name("backgroundColor"), "background-color");
        assert_eq!(css_property_name("color"), "color");
        assert_eq!(css_property_name("border-top-width"), "border-top-width");
        assert_eq!(css_property_name("--brandColor"), "--brandColor");
    }
}
