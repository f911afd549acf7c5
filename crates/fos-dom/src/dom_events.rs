//! DOM Events
//!
//! Listener registration and a synchronous dispatcher. Dispatch bubbles from
//! the target through its ancestors and crosses shadow boundaries to the host.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Document, NodeData, NodeId};

/// Event handed to listeners
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    in_passive_listener: bool,
}

impl Event {
    /// A bubbling, cancelable event
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: None,
            current_target: None,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
            in_passive_listener: false,
        }
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Prevent default action; ignored for non-cancelable events and inside
    /// passive listeners
    pub fn prevent_default(&mut self) {
        if self.cancelable && !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A framework-level event handler. Returning `Some(false)` asks for the
/// default action to be prevented.
pub type Handler = Rc<dyn Fn(&mut Event) -> Option<bool>>;

/// What a registered listener is invoked with
pub enum ListenerArg<'a> {
    /// Regular delivery
    Event(&'a mut Event),
    /// Introspection request: wrapping listeners answer with the handler they
    /// wrap instead of running it
    Unwrap,
}

/// Callback stored on an event target
pub type Listener = Rc<dyn Fn(ListenerArg<'_>) -> Option<Handler>>;

/// Wrap a plain closure as a listener that ignores unwrap requests
pub fn listener_fn(f: impl Fn(&mut Event) + 'static) -> Listener {
    Rc::new(move |arg: ListenerArg<'_>| {
        if let ListenerArg::Event(event) = arg {
            f(event);
        }
        None
    })
}

/// Listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub passive: bool,
    pub once: bool,
}

/// Handle identifying one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Clone)]
pub(crate) struct RegisteredListener {
    pub(crate) id: ListenerId,
    pub(crate) event_type: String,
    pub(crate) listener: Listener,
    pub(crate) options: ListenerOptions,
}

impl std::fmt::Debug for RegisteredListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredListener")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("options", &self.options)
            .finish()
    }
}

impl Document {
    /// `addEventListener`
    pub fn add_event_listener(
        &mut self,
        target: NodeId,
        event_type: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.entry(target).or_default().push(RegisteredListener {
            id,
            event_type: event_type.to_string(),
            listener,
            options,
        });
        id
    }

    /// `removeEventListener`; returns whether a registration was removed
    pub fn remove_event_listener(&mut self, target: NodeId, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&target) else { return false };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() < before;
        if list.is_empty() {
            self.listeners.remove(&target);
        }
        removed
    }

    /// Listeners registered on `target` for `event_type`, in registration order
    pub fn event_listeners(&self, target: NodeId, event_type: &str) -> Vec<Listener> {
        self.listeners
            .get(&target)
            .map(|list| {
                list.iter()
                    .filter(|l| l.event_type == event_type)
                    .map(|l| Rc::clone(&l.listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners on `target` across all event types
    pub fn listener_count(&self, target: NodeId) -> usize {
        self.listeners.get(&target).map_or(0, Vec::len)
    }

    /// Propagation path: target, then ancestors, hopping from shadow roots to
    /// their hosts and ending at the document
    fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut current = target;
        loop {
            let next = match self.tree.get(current).map(|n| (&n.data, n.parent)) {
                Some((_, Some(parent))) => Some(parent),
                Some((NodeData::ShadowRoot { host, .. }, None)) => Some(*host),
                _ => None,
            };
            match next {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => break,
            }
        }
        path
    }
}

/// Dispatch `event` at `target`. Listeners run without the document
/// borrowed, so they may mutate it. Returns `false` when the default action
/// was prevented.
pub fn dispatch_event(doc: &RefCell<Document>, target: NodeId, event: &mut Event) -> bool {
    event.target = Some(target);
    let path = doc.borrow().event_path(target);

    for (depth, node) in path.into_iter().enumerate() {
        if depth > 0 && !event.bubbles {
            break;
        }
        let registered: Vec<RegisteredListener> = doc
            .borrow()
            .listeners
            .get(&node)
            .map(|list| list.iter().filter(|l| l.event_type == event.event_type).cloned().collect())
            .unwrap_or_default();

        event.current_target = Some(node);
        for entry in registered {
            if entry.options.once {
                doc.borrow_mut().remove_event_listener(node, entry.id);
            }
            event.in_passive_listener = entry.options.passive;
            (entry.listener)(ListenerArg::Event(event));
            event.in_passive_listener = false;
        }
        if event.propagation_stopped {
            break;
        }
    }

    event.current_target = None;
    !event.default_prevented
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = Event::new("click").with_cancelable(false);
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let mut event = Event::new("click");
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_dispatch_bubbles_through_shadow_host() {
        let doc = RefCell::new(Document::default());
        let (host, inner) = {
            let mut d = doc.borrow_mut();
            let host = d.create_element("my-comp");
            let body = d.body();
            d.append_child(body, host).unwrap();
            let shadow = d.attach_shadow(host, crate::ShadowRootMode::Open).unwrap();
            let inner = d.create_element("button");
            d.append_child(shadow, inner).unwrap();
            (host, inner)
        };

        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        doc.borrow_mut().add_event_listener(
            host,
            "click",
            listener_fn(move |_| counter.set(counter.get() + 1)),
            ListenerOptions::default(),
        );

        assert!(dispatch_event(&doc, inner, &mut Event::new("click")));
        assert_eq!(seen.get(), 1);

        // Non-bubbling events stay on the target
        dispatch_event(&doc, inner, &mut Event::new("click").with_bubbles(false));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_once_and_removal() {
        let doc = RefCell::new(Document::default());
        let body = doc.borrow().body();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        doc.borrow_mut().add_event_listener(
            body,
            "load",
            listener_fn(move |_| counter.set(counter.get() + 1)),
            ListenerOptions {
                once: true,
                ..Default::default()
            },
        );

        dispatch_event(&doc, body, &mut Event::new("load"));
        dispatch_event(&doc, body, &mut Event::new("load"));
        assert_eq!(seen.get(), 1);
        assert_eq!(doc.borrow().listener_count(body), 0);
    }

    #[test]
    fn test_passive_listener_cannot_prevent_default() {
        let doc = RefCell::new(Document::default());
        let body = doc.borrow().body();
        doc.borrow_mut().add_event_listener(
            body,
            "wheel",
            listener_fn(|event| event.prevent_default()),
            ListenerOptions {
                passive: true,
                ..Default::default()
            },
        );

        assert!(dispatch_event(&doc, body, &mut Event::new("wheel")));
    }
}
