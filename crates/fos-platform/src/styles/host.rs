//! Shared styles host
//!
//! Owns every `<style>`/`<link>` node the platform creates. Nodes live under a
//! style root (the document head or a shadow root) and are reference counted
//! per style text or URL, so identical sheets used by many components exist
//! once per root.
//!
//! Two groups of shadow roots are tracked:
//! - standard hosts, which mirror every head-registered style (the head is
//!   always a member until the host is destroyed)
//! - isolated roots, which only ever receive styles explicitly targeted at them

use fos_dom::{Document, NodeData, NodeId};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::store::{OwnedStyleNode, StyleKind, StyleRootStore, UsageRecord};
use crate::config::RendererConfig;
use crate::error::{RenderError, Result};
use crate::DocumentRef;

/// Attribute tagging server-rendered style nodes with their application
pub const APP_ID_ATTRIBUTE_NAME: &str = "ng-app-id";
/// Development marker for adopted nodes that were reused on the client
pub const STYLE_REUSED_ATTRIBUTE_NAME: &str = "ng-style-reused";

/// Reference-counted owner of all component style nodes
pub struct SharedStylesHost {
    document: DocumentRef,
    app_id: String,
    nonce: Option<String>,
    server_mode: bool,
    dev_mode: bool,
    head: NodeId,
    roots: IndexMap<NodeId, StyleRootStore>,
    standard_hosts: IndexSet<NodeId>,
    isolated_roots: IndexSet<NodeId>,
}

impl SharedStylesHost {
    /// Create the host and adopt server-rendered styles found in `<head>`
    pub fn new(document: DocumentRef, config: &RendererConfig) -> Self {
        let head = document.borrow().head();
        let mut head_store = StyleRootStore::default();
        adopt_server_styles(&mut document.borrow_mut(), &config.app_id, &mut head_store);

        let mut roots = IndexMap::new();
        roots.insert(head, head_store);
        let mut standard_hosts = IndexSet::new();
        standard_hosts.insert(head);

        Self {
            document,
            app_id: config.app_id.clone(),
            nonce: config.nonce.clone(),
            server_mode: config.server_mode,
            dev_mode: config.dev_mode,
            head,
            roots,
            standard_hosts,
            isolated_roots: IndexSet::new(),
        }
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    /// Increment usage of `styles` and `urls`. Without a target the styles
    /// are broadcast: registered under the head and materialized in every
    /// standard host.
    pub fn add_styles(
        &mut self,
        styles: &[String],
        urls: &[String],
        target: Option<NodeId>,
    ) -> Result<()> {
        for style in styles {
            self.add_usage(StyleKind::Inline, style, target)?;
        }
        for url in urls {
            self.add_usage(StyleKind::External, url, target)?;
        }
        Ok(())
    }

    /// Decrement usage; nodes are removed once a record reaches zero
    pub fn remove_styles(&mut self, styles: &[String], urls: &[String], target: Option<NodeId>) {
        for style in styles {
            self.remove_usage(StyleKind::Inline, style, target);
        }
        for url in urls {
            self.remove_usage(StyleKind::External, url, target);
        }
    }

    fn add_usage(&mut self, kind: StyleKind, key: &str, target: Option<NodeId>) -> Result<()> {
        let (root, broadcast) = match target {
            Some(root) => (root, false),
            None => (self.head, true),
        };

        if let Some(record) = self
            .roots
            .get_mut(&root)
            .and_then(|store| store.records_mut(kind).get_mut(key))
        {
            if self.dev_mode && record.usage == 0 {
                let mut doc = self.document.borrow_mut();
                for owned in &record.elements {
                    doc.set_attribute(owned.node, STYLE_REUSED_ATTRIBUTE_NAME, "");
                }
            }
            record.usage += 1;
            trace!("style usage {:?} {} -> {}", kind, key, record.usage);
            return Ok(());
        }

        let fan_out = broadcast && root == self.head && !self.standard_hosts.is_empty();
        let placements: Vec<NodeId> = if fan_out {
            self.standard_hosts.iter().copied().collect()
        } else {
            vec![root]
        };
        let mut elements = Vec::with_capacity(placements.len());
        for placement in placements {
            elements.push(self.add_element(placement, kind, key)?);
        }

        self.roots
            .entry(root)
            .or_default()
            .records_mut(kind)
            .insert(key.to_string(), UsageRecord {
                usage: 1,
                elements,
            });
        trace!("style usage {:?} {} -> 1", kind, key);
        Ok(())
    }

    fn remove_usage(&mut self, kind: StyleKind, key: &str, target: Option<NodeId>) {
        let root = target.unwrap_or(self.head);
        let Some(records) = self.roots.get_mut(&root).map(|store| store.records_mut(kind)) else {
            return;
        };
        let Some(record) = records.get_mut(key) else { return };

        record.usage = record.usage.saturating_sub(1);
        trace!("style usage {:?} {} -> {}", kind, key, record.usage);
        if record.usage == 0 {
            if let Some(record) = records.shift_remove(key) {
                remove_nodes(&mut self.document.borrow_mut(), &record.elements);
            }
        }
    }

    /// Create a style/link node for `key` and append it to `root`
    fn add_element(&self, root: NodeId, kind: StyleKind, key: &str) -> Result<OwnedStyleNode> {
        let mut doc = self.document.borrow_mut();
        let node = create_style_node(&mut doc, kind, key);
        if let Some(nonce) = &self.nonce {
            doc.set_attribute(node, "nonce", nonce);
        }
        if self.server_mode {
            doc.set_attribute(node, APP_ID_ATTRIBUTE_NAME, &self.app_id);
        }
        doc.append_child(root, node)?;
        debug!("created {:?} style node {:?} in root {:?}", kind, node, root);
        Ok(OwnedStyleNode { root, node })
    }

    /// Join the standard broadcast group, cloning every head-registered
    /// style and link into `host`. The clones belong to the head records.
    pub fn add_host(&mut self, host: NodeId) -> Result<()> {
        if !self.standard_hosts.insert(host) {
            return Ok(());
        }
        debug!("standard style host added {:?}", host);

        for kind in [StyleKind::Inline, StyleKind::External] {
            let keys: Vec<String> = self
                .roots
                .get(&self.head)
                .map(|store| store.records(kind).keys().cloned().collect())
                .unwrap_or_default();
            for key in keys {
                let owned = self.add_element(host, kind, &key)?;
                if let Some(record) = self
                    .roots
                    .get_mut(&self.head)
                    .and_then(|s| s.records_mut(kind).get_mut(&key))
                {
                    record.elements.push(owned);
                }
            }
        }
        Ok(())
    }

    /// Leave the broadcast group, removing only nodes placed inside `host`
    pub fn remove_host(&mut self, host: NodeId) {
        self.standard_hosts.shift_remove(&host);

        let mut removed = self
            .roots
            .get_mut(&self.head)
            .map(|store| store.take_placed_in(host))
            .unwrap_or_default();
        if host != self.head {
            if let Some(mut store) = self.roots.shift_remove(&host) {
                removed.extend(store.drain());
            }
        }
        debug!("standard style host removed {:?} ({} nodes)", host, removed.len());
        remove_nodes(&mut self.document.borrow_mut(), &removed);
    }

    /// Register an isolated shadow root
    pub fn add_shadow_root(&mut self, shadow_root: NodeId) -> Result<()> {
        if self.server_mode {
            return Err(RenderError::ServerModeShadowRoot);
        }
        if !self.document.borrow().supports_shadow_dom() {
            return Err(RenderError::ShadowDomUnsupported);
        }
        if !self.isolated_roots.insert(shadow_root) {
            return Err(RenderError::ShadowRootAlreadyRegistered);
        }
        debug!("isolated shadow root added {:?}", shadow_root);
        Ok(())
    }

    /// Unregister an isolated shadow root and drop its styles
    pub fn remove_shadow_root(&mut self, shadow_root: NodeId) -> Result<()> {
        if !self.isolated_roots.shift_remove(&shadow_root) {
            return Err(RenderError::ShadowRootNotRegistered);
        }
        if let Some(mut store) = self.roots.shift_remove(&shadow_root) {
            remove_nodes(&mut self.document.borrow_mut(), &store.drain());
        }
        debug!("isolated shadow root removed {:?}", shadow_root);
        Ok(())
    }

    /// Remove every owned node and clear all registries. Safe to call more
    /// than once.
    pub fn destroy(&mut self) {
        if self.roots.values().all(StyleRootStore::is_empty)
            && self.standard_hosts.is_empty()
            && self.isolated_roots.is_empty()
        {
            return;
        }
        let nodes: Vec<OwnedStyleNode> =
            self.roots.values_mut().flat_map(StyleRootStore::drain).collect();
        remove_nodes(&mut self.document.borrow_mut(), &nodes);
        self.roots.retain(|root, _| *root == self.head);
        self.standard_hosts.clear();
        self.isolated_roots.clear();
        debug!("shared styles host destroyed ({} nodes)", nodes.len());
    }

    /// Current usage of `key` under `root`, if a record exists
    pub fn usage_count(&self, root: NodeId, kind: StyleKind, key: &str) -> Option<usize> {
        self.record(root, kind, key).map(|record| record.usage)
    }

    /// Nodes owned by the record of `key` under `root`
    pub fn style_nodes(&self, root: NodeId, kind: StyleKind, key: &str) -> Vec<NodeId> {
        self.record(root, kind, key)
            .map(|record| record.elements.iter().map(|owned| owned.node).collect())
            .unwrap_or_default()
    }

    /// Keys with a record under `root`, in insertion order
    pub fn keys(&self, root: NodeId, kind: StyleKind) -> Vec<String> {
        self.roots
            .get(&root)
            .map(|store| store.records(kind).keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn standard_hosts(&self) -> Vec<NodeId> {
        self.standard_hosts.iter().copied().collect()
    }

    pub fn is_standard_host(&self, root: NodeId) -> bool {
        self.standard_hosts.contains(&root)
    }

    pub fn is_isolated_root(&self, root: NodeId) -> bool {
        self.isolated_roots.contains(&root)
    }

    fn record(&self, root: NodeId, kind: StyleKind, key: &str) -> Option<&UsageRecord> {
        self.roots.get(&root).and_then(|store| store.records(kind).get(key))
    }
}

impl std::fmt::Debug for SharedStylesHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStylesHost")
            .field("app_id", &self.app_id)
            .field("roots", &self.roots.len())
            .field("standard_hosts", &self.standard_hosts)
            .field("isolated_roots", &self.isolated_roots)
            .finish()
    }
}

fn create_style_node(doc: &mut Document, kind: StyleKind, key: &str) -> NodeId {
    match kind {
        StyleKind::Inline => {
            let style = doc.create_element("style");
            doc.set_text_content(style, key);
            style
        }
        StyleKind::External => {
            let link = doc.create_element("link");
            doc.set_attribute(link, "rel", "stylesheet");
            doc.set_attribute(link, "href", key);
            link
        }
    }
}

fn remove_nodes(doc: &mut Document, nodes: &[OwnedStyleNode]) {
    for owned in nodes {
        doc.remove(owned.node);
    }
}

/// Take over `<style>`/`<link>` nodes rendered on the server for `app_id`.
/// Records start at zero so the first registration reuses them.
fn adopt_server_styles(doc: &mut Document, app_id: &str, store: &mut StyleRootStore) {
    let head = doc.head();
    for node in doc.children(head) {
        if doc.get_attribute(node, APP_ID_ATTRIBUTE_NAME) != Some(app_id) {
            continue;
        }
        let (kind, key) = match doc.tree().get(node).map(|n| &n.data) {
            Some(NodeData::Element(el)) if el.name == "link" => {
                let href = el.attrs.get("href").unwrap_or_default();
                let file = href.rsplit('/').next().unwrap_or(href);
                (StyleKind::External, file.to_string())
            }
            Some(NodeData::Element(el)) if el.name == "style" => {
                (StyleKind::Inline, doc.text_content(node))
            }
            _ => continue,
        };
        doc.remove_attribute(node, APP_ID_ATTRIBUTE_NAME);
        if key.is_empty() && kind == StyleKind::Inline {
            continue;
        }
        debug!("adopted server {:?} style {:?}", kind, node);
        let record = UsageRecord {
            usage: 0,
            elements: vec![OwnedStyleNode { root: head, node }],
        };
        store.records_mut(kind).insert(key, record);
    }
}
