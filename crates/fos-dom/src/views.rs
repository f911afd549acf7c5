//! Logical component views
//!
//! The template layer records, for every node it creates, the component view
//! that owns it. Views form a parent chain that follows component nesting,
//! which differs from DOM parentage once content is projected.

use std::collections::HashSet;

use crate::{Document, NodeId};

/// Logical view identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub(crate) u32);

/// One component (or embedded) view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalView {
    /// Host element of the component that owns this view
    pub host: Option<NodeId>,
    pub parent: Option<ViewId>,
}

impl Document {
    pub fn create_view(&mut self, host: Option<NodeId>, parent: Option<ViewId>) -> ViewId {
        let id = ViewId(self.views.len() as u32);
        self.views.push(LogicalView { host, parent });
        id
    }

    pub fn set_view_parent(&mut self, view: ViewId, parent: Option<ViewId>) {
        if let Some(v) = self.views.get_mut(view.0 as usize) {
            v.parent = parent;
        }
    }

    pub fn view(&self, view: ViewId) -> Option<LogicalView> {
        self.views.get(view.0 as usize).copied()
    }

    /// Record that `node` was created by `view`'s template
    pub fn attach_to_view(&mut self, node: NodeId, view: ViewId) {
        self.node_views.insert(node, view);
    }

    pub fn view_of(&self, node: NodeId) -> Option<ViewId> {
        self.node_views.get(&node).copied()
    }

    /// Host elements along the ownership chain of `node`, innermost first.
    /// Stops at the first repeated view.
    pub fn owner_hosts(&self, node: NodeId) -> Vec<NodeId> {
        let mut hosts = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.view_of(node);
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let Some(view) = self.view(id) else { break };
            if let Some(host) = view.host {
                hosts.push(host);
            }
            current = view.parent;
        }
        hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_hosts_follow_view_chain() {
        let mut doc = Document::default();
        let outer_host = doc.create_element("outer-comp");
        let inner_host = doc.create_element("inner-comp");
        let outer = doc.create_view(Some(outer_host), None);
        let inner = doc.create_view(Some(inner_host), Some(outer));
        let button = doc.create_element("button");
        doc.attach_to_view(button, inner);

        assert_eq!(doc.owner_hosts(button), vec![inner_host, outer_host]);
        assert!(doc.owner_hosts(outer_host).is_empty());
    }

    #[test]
    fn test_owner_hosts_survive_cycles() {
        let mut doc = Document::default();
        let a_host = doc.create_element("a-comp");
        let b_host = doc.create_element("b-comp");
        let a = doc.create_view(Some(a_host), None);
        let b = doc.create_view(Some(b_host), Some(a));
        doc.set_view_parent(a, Some(b));
        let node = doc.create_text("x");
        doc.attach_to_view(node, b);

        assert_eq!(doc.owner_hosts(node), vec![b_host, a_host]);
    }
}
