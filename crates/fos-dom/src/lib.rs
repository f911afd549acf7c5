//! fOS DOM - Document Object Model
//!
//! Arena-based in-memory DOM used as the host environment of the platform
//! renderers: tree mutation, attributes and inline styles, shadow roots,
//! selectors, event listeners and the logical component-view registry.

mod attributes;
mod document;
mod dom_events;
mod element;
mod node;
mod operations;
mod shadow;
mod tree;
mod views;

pub use attributes::{Attr, NamedNodeMap};
pub use document::Document;
pub use dom_events::{
    Event, Handler, Listener, ListenerArg, ListenerId, ListenerOptions, dispatch_event, listener_fn,
};
pub use element::SimpleSelector;
pub use node::{ElementData, Node, NodeData, PropertyValue, StyleDeclaration};
pub use operations::{DomError, DomResult};
pub use shadow::ShadowRootMode;
pub use tree::{ChildIterator, DomTree};
pub use views::{LogicalView, ViewId};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node
    pub fn index(self) -> u32 {
        self.0
    }
}
