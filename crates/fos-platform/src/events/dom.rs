//! DOM events plugin

use std::rc::Rc;

use fos_dom::{Listener, ListenerOptions, NodeId};

use super::{DetachFn, EventManagerPlugin};
use crate::DocumentRef;

/// Catch-all plugin attaching listeners directly on the target node
#[derive(Debug, Clone)]
pub struct DomEventsPlugin {
    document: DocumentRef,
}

impl DomEventsPlugin {
    pub fn new(document: DocumentRef) -> Self {
        Self { document }
    }
}

impl EventManagerPlugin for DomEventsPlugin {
    fn name(&self) -> &str {
        "dom"
    }

    fn supports(&self, _event_name: &str) -> bool {
        true
    }

    fn is_catch_all(&self) -> bool {
        true
    }

    fn add_event_listener(
        &self,
        element: NodeId,
        event_name: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> DetachFn {
        let id = self
            .document
            .borrow_mut()
            .add_event_listener(element, event_name, listener, options);
        let document = Rc::clone(&self.document);
        Box::new(move || {
            document.borrow_mut().remove_event_listener(element, id);
        })
    }
}
