//! DOM Node
//!
//! Nodes live in an arena and link to each other through `NodeId`s.

use std::collections::HashMap;

use crate::{NamedNodeMap, NodeId, ShadowRootMode};

/// DOM Node - links plus node-specific data
#[derive(Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    /// Last child (for O(1) append)
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Global event target standing in for `window`; never part of the tree
    Window,
    Element(ElementData),
    Text(String),
    Comment(String),
    /// Inert fragment (template content)
    DocumentFragment,
    ShadowRoot { host: NodeId, mode: ShadowRootMode },
}

/// Element-specific data
#[derive(Debug, Default)]
pub struct ElementData {
    /// Local tag name, lowercase for HTML elements
    pub name: String,
    /// Namespace URI for elements created with a namespace
    pub namespace: Option<String>,
    pub attrs: NamedNodeMap,
    /// Inline style declarations in dash-case
    pub styles: Vec<StyleDeclaration>,
    /// Properties set directly on the element object
    pub properties: HashMap<String, PropertyValue>,
    pub shadow_root: Option<NodeId>,
    /// Content fragment of a `<template>` element
    pub template_content: Option<NodeId>,
}

impl ElementData {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            ..Default::default()
        }
    }

    /// Class tokens from the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs.get("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn style(&self, property: &str) -> Option<&StyleDeclaration> {
        self.styles.iter().find(|s| s.property == property)
    }
}

/// One inline style declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Value of an element property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
