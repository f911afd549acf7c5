//! DOM Node Operations
//!
//! Node creation and tree mutation: appendChild, insertBefore, remove,
//! textContent.

use crate::{Document, ElementData, NodeData, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),
    /// Inserting a node into itself or one of its descendants
    #[error("hierarchy request error: {child:?} cannot be inserted into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("element {0:?} already hosts a shadow root")]
    AlreadyHasShadowRoot(NodeId),
    #[error("shadow roots are not supported by this document")]
    ShadowRootUnsupported,
    #[error("'{0}' is not a valid selector")]
    InvalidSelector(String),
}

impl Document {
    /// Create an HTML element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_element_ns(None, name)
    }

    /// Create an element, optionally in a namespace. `<template>` elements get
    /// an inert content fragment.
    pub fn create_element_ns(&mut self, namespace: Option<&str>, name: &str) -> NodeId {
        let name = if namespace.is_none() { name.to_ascii_lowercase() } else { name.to_string() };
        let is_template = namespace.is_none() && name == "template";
        let mut data = ElementData::new(name, namespace.map(str::to_string));
        if is_template {
            data.template_content = Some(self.tree.create(NodeData::DocumentFragment));
        }
        self.tree.create(NodeData::Element(data))
    }

    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.tree.create(NodeData::Text(value.to_string()))
    }

    pub fn create_comment(&mut self, value: &str) -> NodeId {
        self.tree.create(NodeData::Comment(value.to_string()))
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.tree.create(NodeData::DocumentFragment)
    }

    /// Append a child node, moving it if it is already attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insert(parent, child)?;
        self.tree.append_child(parent, child);
        Ok(())
    }

    /// Insert before a reference node (append when `reference` is `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.check_insert(parent, child)?;
        self.tree.insert_before(parent, child, reference);
        Ok(())
    }

    /// Detach a node from its parent (`ChildNode.remove()`)
    pub fn remove(&mut self, node: NodeId) {
        self.tree.detach(node);
    }

    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next_sibling(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(node).map(|(id, _)| id).collect()
    }

    /// Content fragment of a `<template>` element
    pub fn template_content(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.as_element()?.template_content
    }

    /// Whether the node is currently attached under the document root
    pub fn is_connected(&self, node: NodeId) -> bool {
        let root = self.root_node(node);
        if root == self.root() {
            return true;
        }
        match self.tree.get(root).map(|n| &n.data) {
            Some(NodeData::ShadowRoot { host, .. }) => self.is_connected(*host),
            _ => false,
        }
    }

    /// `nodeValue` setter: replaces the data of text and comment nodes
    pub fn set_node_value(&mut self, node: NodeId, value: &str) {
        if let Some(node) = self.tree.get_mut(node) {
            match &mut node.data {
                NodeData::Text(text) | NodeData::Comment(text) => *text = value.to_string(),
                _ => {}
            }
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.tree.get(node).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Comment(_)) | None => {}
            Some(_) => {
                for (child, _) in self.tree.children(node) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// `textContent` setter: drops all children and inserts a single text
    /// node unless `value` is empty
    pub fn set_text_content(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.tree.get_mut(node) {
            if let NodeData::Text(text) | NodeData::Comment(text) = &mut n.data {
                *text = value.to_string();
                return;
            }
        }
        for child in self.children(node) {
            self.tree.detach(child);
        }
        if !value.is_empty() {
            let text = self.create_text(value);
            self.tree.append_child(node, text);
        }
    }

    /// Tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree.get(node)?.as_element().map(|e| e.name.as_str())
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tree.get(node).is_some_and(|n| n.is_element())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.tree.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.tree.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if self.tree.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }
}
