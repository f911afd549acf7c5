//! Per-root style usage records

use fos_dom::NodeId;
use indexmap::IndexMap;

/// Inline style text or an external style sheet URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Inline,
    External,
}

/// A style node owned by a usage record, and the root it was placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedStyleNode {
    pub root: NodeId,
    pub node: NodeId,
}

/// Reference count plus the concrete nodes it keeps alive
#[derive(Debug, Clone, Default)]
pub struct UsageRecord {
    pub usage: usize,
    pub elements: Vec<OwnedStyleNode>,
}

/// Usage records of one style root, keyed by style text or URL
#[derive(Debug, Default)]
pub(crate) struct StyleRootStore {
    inline: IndexMap<String, UsageRecord>,
    external: IndexMap<String, UsageRecord>,
}

impl StyleRootStore {
    pub(crate) fn records(&self, kind: StyleKind) -> &IndexMap<String, UsageRecord> {
        match kind {
            StyleKind::Inline => &self.inline,
            StyleKind::External => &self.external,
        }
    }

    pub(crate) fn records_mut(&mut self, kind: StyleKind) -> &mut IndexMap<String, UsageRecord> {
        match kind {
            StyleKind::Inline => &mut self.inline,
            StyleKind::External => &mut self.external,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.external.is_empty()
    }

    /// Drop every record, returning the nodes they owned
    pub(crate) fn drain(&mut self) -> Vec<OwnedStyleNode> {
        self.inline
            .drain(..)
            .chain(self.external.drain(..))
            .flat_map(|(_, record)| record.elements)
            .collect()
    }

    /// Detach every node placed in `root` from the records that own it
    pub(crate) fn take_placed_in(&mut self, root: NodeId) -> Vec<OwnedStyleNode> {
        let mut taken = Vec::new();
        for record in self.inline.values_mut().chain(self.external.values_mut()) {
            record.elements.retain(|owned| {
                if owned.root == root {
                    taken.push(*owned);
                    false
                } else {
                    true
                }
            });
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    fn placed(doc: &mut Document, root: NodeId) -> OwnedStyleNode {
        OwnedStyleNode {
            root,
            node: doc.create_element("style"),
        }
    }

    #[test]
    fn test_take_placed_in_keeps_other_roots() {
        let mut doc = Document::default();
        let (head, shadow) = (doc.head(), doc.create_document_fragment());
        let mut store = StyleRootStore::default();
        let inline = UsageRecord {
            usage: 1,
            elements: vec![placed(&mut doc, head), placed(&mut doc, shadow)],
        };
        let external = UsageRecord {
            usage: 1,
            elements: vec![placed(&mut doc, shadow)],
        };
        store.records_mut(StyleKind::Inline).insert("a{}".into(), inline);
        store.records_mut(StyleKind::External).insert("x.css".into(), external);

        let taken = store.take_placed_in(shadow);
        assert_eq!(taken.len(), 2);
        assert_eq!(store.records(StyleKind::Inline)["a{}"].elements[0].root, head);
        assert!(store.records(StyleKind::External)["x.css"].elements.is_empty());
        assert!(!store.is_empty());
    }

    #[test]
    fn test_drain_empties_store() {
        let mut doc = Document::default();
        let head = doc.head();
        let mut store = StyleRootStore::default();
        let record = UsageRecord {
            usage: 1,
            elements: vec![placed(&mut doc, head)],
        };
        store.records_mut(StyleKind::Inline).insert("a{}".into(), record);
        assert_eq!(store.drain().len(), 1);
        assert!(store.is_empty());
    }
}
