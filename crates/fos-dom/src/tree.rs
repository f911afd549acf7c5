//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; detaching only unlinks them, so a `NodeId` stays
//! valid for the lifetime of the tree.

use crate::{Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// Root (document) node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Allocate a detached node
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes ever allocated
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Iterate over the children of a node
    pub fn children(&self, parent: NodeId) -> ChildIterator<'_> {
        let first = self.get(parent).and_then(|n| n.first_child);
        ChildIterator {
            tree: self,
            current: first,
        }
    }

    /// Unlink a node from its parent, keeping its subtree intact
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        let Some(parent) = parent else { return };

        match prev {
            Some(prev) => self.nodes[prev.0 as usize].next_sibling = next,
            None => self.nodes[parent.0 as usize].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0 as usize].prev_sibling = prev,
            None => self.nodes[parent.0 as usize].last_child = prev,
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.0 as usize].last_child;
        match last {
            Some(last) => self.nodes[last.0 as usize].next_sibling = Some(child),
            None => self.nodes[parent.0 as usize].first_child = Some(child),
        }
        let node = &mut self.nodes[child.0 as usize];
        node.parent = Some(parent);
        node.prev_sibling = last;
        self.nodes[parent.0 as usize].last_child = Some(child);
    }

    /// Insert `child` before `reference`; appends when the reference is not a
    /// child of `parent`
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let reference = reference.filter(|r| self.parent(*r) == Some(parent) && *r != child);
        let Some(reference) = reference else {
            self.append_child(parent, child);
            return;
        };

        self.detach(child);
        let prev = self.nodes[reference.0 as usize].prev_sibling;
        match prev {
            Some(prev) => self.nodes[prev.0 as usize].next_sibling = Some(child),
            None => self.nodes[parent.0 as usize].first_child = Some(child),
        }
        let node = &mut self.nodes[child.0 as usize];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = Some(reference);
        self.nodes[reference.0 as usize].prev_sibling = Some(child);
    }

    /// Whether `ancestor` is `node` or one of its tree ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

/// Iterator over the children of a node
pub struct ChildIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIterator<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.tree.get(id)?;
        self.current = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementData;

    fn element(tree: &mut DomTree, name: &str) -> NodeId {
        tree.create(NodeData::Element(ElementData::new(name, None)))
    }

    #[test]
    fn test_append_and_detach() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        let c = element(&mut tree, "c");
        tree.append_child(tree.root(), a);
        tree.append_child(tree.root(), b);
        tree.append_child(tree.root(), c);

        tree.detach(b);
        let ids: Vec<_> = tree.children(tree.root()).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(tree.next_sibling(a), Some(c));
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        let c = element(&mut tree, "c");
        tree.append_child(tree.root(), a);
        tree.append_child(tree.root(), c);
        tree.insert_before(tree.root(), b, Some(c));

        let ids: Vec<_> = tree.children(tree.root()).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);

        // Unknown reference appends
        let d = element(&mut tree, "d");
        tree.insert_before(tree.root(), d, Some(d));
        assert_eq!(tree.get(tree.root()).and_then(|n| n.last_child), Some(d));
    }

    #[test]
    fn test_moving_a_node_relinks() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        tree.append_child(tree.root(), a);
        tree.append_child(a, b);
        tree.append_child(tree.root(), b);

        assert_eq!(tree.children(a).count(), 0);
        assert_eq!(tree.parent(b), Some(tree.root()));
        assert!(tree.is_inclusive_ancestor(tree.root(), b));
    }
}
