//! Handler wrapping

use std::rc::Rc;

use fos_dom::{Handler, Listener, ListenerArg, NodeId};

/// Hook allowed to re-wrap every listener a renderer registers
pub trait TracingService {
    fn wrap_event_listener(&self, target: NodeId, event_name: &str, listener: Listener) -> Listener;
}

/// Wrap a framework handler as a DOM listener.
///
/// An unwrap request yields the original handler without running it. A
/// handler returning `Some(false)` prevents the default action.
pub fn decorate_prevent_default(handler: Handler) -> Listener {
    Rc::new(move |arg: ListenerArg<'_>| match arg {
        ListenerArg::Unwrap => Some(Rc::clone(&handler)),
        ListenerArg::Event(event) => {
            if handler(event) == Some(false) {
                event.prevent_default();
            }
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Event;
    use std::cell::Cell;

    #[test]
    fn test_false_prevents_default() {
        let listener = decorate_prevent_default(Rc::new(|_: &mut Event| Some(false)));
        let mut event = Event::new("submit");
        assert!(listener(ListenerArg::Event(&mut event)).is_none());
        assert!(event.is_default_prevented());

        let listener = decorate_prevent_default(Rc::new(|_: &mut Event| Some(true)));
        let mut event = Event::new("submit");
        listener(ListenerArg::Event(&mut event));
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_unwrap_returns_original_without_calling() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let handler: Handler = Rc::new(move |_: &mut Event| {
            counter.set(counter.get() + 1);
            None
        });
        let listener = decorate_prevent_default(Rc::clone(&handler));

        let unwrapped = listener(ListenerArg::Unwrap).unwrap();
        assert!(Rc::ptr_eq(&unwrapped, &handler));
        assert_eq!(calls.get(), 0);
    }
}
