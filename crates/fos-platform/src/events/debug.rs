//! Debug helpers for driving listeners from tests

use fos_dom::{Event, ListenerArg, NodeId};

use crate::DocumentRef;

/// Invoke every listener registered for `event_name` on `node`.
///
/// Listeners registered through a renderer are unwrapped first so the
/// original handler runs directly, bypassing default-action handling.
/// Returns the number of listeners invoked.
pub fn trigger_event_handler(
    document: &DocumentRef,
    node: NodeId,
    event_name: &str,
    event: &mut Event,
) -> usize {
    let listeners = document.borrow().event_listeners(node, event_name);
    for listener in &listeners {
        match listener(ListenerArg::Unwrap) {
            Some(handler) => {
                handler(event);
            }
            None => {
                listener(ListenerArg::Event(event));
            }
        }
    }
    listeners.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::decorate_prevent_default;
    use fos_dom::{listener_fn, Document, ListenerOptions};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_triggers_wrapped_and_plain_listeners() {
        let document = Rc::new(RefCell::new(Document::default()));
        let button = document.borrow_mut().create_element("button");
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let wrapped = decorate_prevent_default(Rc::new(move |_: &mut Event| {
            counter.set(counter.get() + 1);
            Some(false)
        }));
        let counter = Rc::clone(&hits);
        let plain = listener_fn(move |_| counter.set(counter.get() + 10));
        {
            let mut doc = document.borrow_mut();
            doc.add_event_listener(button, "click", wrapped, ListenerOptions::default());
            doc.add_event_listener(button, "click", plain, ListenerOptions::default());
        }

        let mut event = Event::new("click");
        assert_eq!(trigger_event_handler(&document, button, "click", &mut event), 2);
        assert_eq!(hits.get(), 11);
        // The original handler ran directly, so its `false` was not acted on
        assert!(!event.is_default_prevented());
    }
}
