//! Style scope registry
//!
//! Records which shadow roots are isolated and which are standard, and
//! resolves where the styles of an arbitrary element should go. Each
//! registration maps a shadow root to its host element; host lookups scan the
//! maps, so no back-pointer from host to root is stored.

use fos_dom::{Document, NodeId};
use indexmap::IndexMap;
use tracing::trace;

#[derive(Debug, Default)]
pub struct StyleScopeRegistry {
    isolated: IndexMap<NodeId, NodeId>,
    standard: IndexMap<NodeId, NodeId>,
}

impl StyleScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_isolated(&mut self, shadow_root: NodeId, host: NodeId) {
        self.isolated.insert(shadow_root, host);
    }

    pub fn register_standard(&mut self, shadow_root: NodeId, host: NodeId) {
        self.standard.insert(shadow_root, host);
    }

    pub fn deregister_isolated(&mut self, shadow_root: NodeId) {
        self.isolated.shift_remove(&shadow_root);
    }

    pub fn deregister_standard(&mut self, shadow_root: NodeId) {
        self.standard.shift_remove(&shadow_root);
    }

    pub fn is_isolated(&self, shadow_root: NodeId) -> bool {
        self.isolated.contains_key(&shadow_root)
    }

    pub fn is_standard(&self, shadow_root: NodeId) -> bool {
        self.standard.contains_key(&shadow_root)
    }

    pub fn is_registered(&self, shadow_root: NodeId) -> bool {
        self.is_isolated(shadow_root) || self.is_standard(shadow_root)
    }

    /// Host element recorded for `shadow_root`
    pub fn host_of(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.isolated.get(&shadow_root).or_else(|| self.standard.get(&shadow_root)).copied()
    }

    /// Every registered standard root, in registration order
    pub fn standard_roots(&self) -> Vec<NodeId> {
        self.standard.keys().copied().collect()
    }

    /// Style roots that should receive styles for `element`.
    ///
    /// An element whose root node is a registered shadow root resolves
    /// directly. Otherwise the logical ownership chain is walked outwards and
    /// the first host owning a registered root decides. An empty result means
    /// the caller should broadcast.
    pub fn determine_style_targets(&self, doc: &Document, element: NodeId) -> Vec<NodeId> {
        if !doc.supports_shadow_dom() {
            return Vec::new();
        }

        let root = doc.root_node(element);
        if doc.is_shadow_root(root) && self.is_registered(root) {
            return self.roots_for_context(root);
        }

        for host in doc.owner_hosts(element) {
            if let Some(roots) = self.roots_hosted_by(host) {
                trace!("style targets for {:?} resolved through owner {:?}", element, host);
                return roots;
            }
        }
        Vec::new()
    }

    fn roots_hosted_by(&self, host: NodeId) -> Option<Vec<NodeId>> {
        self.isolated
            .iter()
            .chain(self.standard.iter())
            .find(|(_, h)| **h == host)
            .map(|(root, _)| self.roots_for_context(*root))
    }

    fn roots_for_context(&self, shadow_root: NodeId) -> Vec<NodeId> {
        if self.is_isolated(shadow_root) {
            vec![shadow_root]
        } else {
            self.standard_roots()
        }
    }
}
