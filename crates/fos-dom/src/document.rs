//! Document - High-level document API

use std::collections::HashMap;

use crate::dom_events::RegisteredListener;
use crate::views::LogicalView;
use crate::{DomTree, ElementData, NodeData, NodeId, ViewId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    window: NodeId,
    /// Whether the host supports attaching shadow roots
    pub(crate) shadow_dom_supported: bool,
    pub(crate) listeners: HashMap<NodeId, Vec<RegisteredListener>>,
    pub(crate) next_listener_id: u64,
    pub(crate) views: Vec<LogicalView>,
    pub(crate) node_views: HashMap<NodeId, ViewId>,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create(NodeData::Element(ElementData::new("html", None)));
        let head = tree.create(NodeData::Element(ElementData::new("head", None)));
        let body = tree.create(NodeData::Element(ElementData::new("body", None)));
        let window = tree.create(NodeData::Window);

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            window,
            shadow_dom_supported: true,
            listeners: HashMap::new(),
            next_listener_id: 1,
            views: Vec::new(),
            node_views: HashMap::new(),
        }
    }

    /// Same as [`Document::new`], for hosts without shadow DOM support
    pub fn without_shadow_dom(url: &str) -> Self {
        let mut doc = Self::new(url);
        doc.shadow_dom_supported = false;
        doc
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// The `window` event target
    pub fn window(&self) -> NodeId {
        self.window
    }

    pub fn supports_shadow_dom(&self) -> bool {
        self.shadow_dom_supported
    }

    /// Resolve a global event target name (`window`, `document`, `body`)
    pub fn global_event_target(&self, name: &str) -> Option<NodeId> {
        match name {
            "window" => Some(self.window),
            "document" => Some(self.root()),
            "body" => Some(self.body_element),
            _ => None,
        }
    }

    /// `href` of the first `<base>` element, if any
    pub fn base_href(&self) -> Option<String> {
        let base = self.query_selector("base").ok().flatten()?;
        self.get_attribute(base, "href").map(str::to_string)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Serialize a node and its subtree. Shadow roots are written as
    /// declarative `<template shadowrootmode>` children of their host.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize(node, &mut out);
        out
    }

    /// Serialize the children of a node
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for (child, _) in self.tree.children(node) {
            self.serialize(child, &mut out);
        }
        out
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.tree.get(id) else { return };
        match &node.data {
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for attr in el.attrs.iter() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape(&attr.value, true));
                        out.push('"');
                    }
                }
                if !el.styles.is_empty() {
                    let decls: Vec<String> = el
                        .styles
                        .iter()
                        .map(|s| {
                            let important = if s.important { " !important" } else { "" };
                            format!("{}: {}{};", s.property, s.value, important)
                        })
                        .collect();
                    out.push_str(" style=\"");
                    out.push_str(&escape(&decls.join(" "), true));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.name.as_str()) {
                    return;
                }
                if let Some(shadow) = el.shadow_root {
                    out.push_str("<template shadowrootmode=\"open\">");
                    out.push_str(&self.inner_html(shadow));
                    out.push_str("</template>");
                }
                if let Some(content) = el.template_content {
                    out.push_str(&self.inner_html(content));
                }
                out.push_str(&self.inner_html(id));
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
            NodeData::Text(text) => out.push_str(&escape(text, false)),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot { .. } => {
                out.push_str(&self.inner_html(id));
            }
            NodeData::Window => {}
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
