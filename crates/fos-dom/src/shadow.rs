//! Shadow DOM
//!
//! Shadow root attachment and root-node resolution. A shadow root is a node
//! without a parent; its host points at it and it points back at its host.

use crate::{DomError, DomResult, Document, NodeData, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl Document {
    /// Attach a shadow root to `host` (`Element.attachShadow`)
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        if !self.shadow_dom_supported {
            return Err(DomError::ShadowRootUnsupported);
        }
        let el = self
            .tree
            .get(host)
            .and_then(|n| n.as_element())
            .ok_or(DomError::NotFound(host))?;
        if el.shadow_root.is_some() {
            return Err(DomError::AlreadyHasShadowRoot(host));
        }

        let shadow = self.tree.create(NodeData::ShadowRoot { host, mode });
        if let Some(el) = self.tree.get_mut(host).and_then(|n| n.as_element_mut()) {
            el.shadow_root = Some(shadow);
        }
        tracing::trace!(?host, ?shadow, "attached shadow root");
        Ok(shadow)
    }

    /// Shadow root hosted by `host`
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.tree.get(host)?.as_element()?.shadow_root
    }

    /// Host element of a shadow root
    pub fn shadow_host(&self, shadow: NodeId) -> Option<NodeId> {
        match self.tree.get(shadow)?.data {
            NodeData::ShadowRoot { host, .. } => Some(host),
            _ => None,
        }
    }

    pub fn is_shadow_root(&self, node: NodeId) -> bool {
        self.shadow_host(node).is_some()
    }

    /// Topmost ancestor of `node` (`Node.getRootNode`): the document for
    /// connected nodes, the shadow root for nodes inside a shadow tree, or
    /// the detached subtree's top node
    pub fn root_node(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.tree.parent(current) {
            current = parent;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_shadow() {
        let mut doc = Document::default();
        let host = doc.create_element("my-comp");
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();

        assert_eq!(doc.shadow_root(host), Some(shadow));
        assert_eq!(doc.shadow_host(shadow), Some(host));
        assert!(doc.is_shadow_root(shadow));
        assert_eq!(doc.parent_node(shadow), None);
        assert_eq!(
            doc.attach_shadow(host, ShadowRootMode::Open),
            Err(DomError::AlreadyHasShadowRoot(host))
        );
    }

    #[test]
    fn test_root_node_inside_shadow_tree() {
        let mut doc = Document::default();
        let host = doc.create_element("my-comp");
        doc.append_child(doc.body(), host).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inner = doc.create_element("p");
        doc.append_child(shadow, inner).unwrap();

        assert_eq!(doc.root_node(inner), shadow);
        assert_eq!(doc.root_node(host), doc.root());
        assert!(doc.is_connected(inner));
    }

    #[test]
    fn test_unsupported_host() {
        let mut doc = Document::without_shadow_dom("about:blank");
        let host = doc.create_element("my-comp");
        assert_eq!(
            doc.attach_shadow(host, ShadowRootMode::Open),
            Err(DomError::ShadowRootUnsupported)
        );
    }
}
