//! Event manager and plugin interface

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fos_dom::{Listener, ListenerOptions, NodeId};
use tracing::debug;

use super::DetachFn;
use crate::error::{RenderError, Result};

/// Attaches listeners for the event names it claims.
///
/// Implement this trait to handle custom event names (key combinations,
/// gestures, ...). A catch-all plugin claims every name and is always
/// consulted last.
pub trait EventManagerPlugin {
    /// Short plugin name used in logs
    fn name(&self) -> &str;

    /// Whether this plugin handles `event_name`
    fn supports(&self, event_name: &str) -> bool;

    /// Whether this plugin claims every event name
    fn is_catch_all(&self) -> bool {
        false
    }

    /// Attach `listener` and return a callback that detaches it
    fn add_event_listener(
        &self,
        element: NodeId,
        event_name: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> DetachFn;
}

/// Routes listener registration to the first plugin supporting the event.
///
/// The winning plugin is memoized per event name and never re-resolved.
pub struct EventManager {
    plugins: Vec<Rc<dyn EventManagerPlugin>>,
    resolved: RefCell<HashMap<String, Rc<dyn EventManagerPlugin>>>,
}

impl EventManager {
    /// Build a manager. Specific plugins are consulted newest first, so a
    /// later registration overrides an earlier one for the same event;
    /// catch-all plugins come last in registration order.
    pub fn new(plugins: Vec<Rc<dyn EventManagerPlugin>>) -> Self {
        let (mut ordered, catch_all): (Vec<_>, Vec<_>) =
            plugins.into_iter().partition(|p| !p.is_catch_all());
        ordered.reverse();
        ordered.extend(catch_all);
        Self {
            plugins: ordered,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    /// Plugins in resolution order
    pub fn plugins(&self) -> &[Rc<dyn EventManagerPlugin>] {
        &self.plugins
    }

    /// Register `listener` for `event_name` on `element` through the
    /// responsible plugin
    pub fn add_event_listener(
        &self,
        element: NodeId,
        event_name: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> Result<DetachFn> {
        let plugin = self.find_plugin(event_name)?;
        Ok(plugin.add_event_listener(element, event_name, listener, options))
    }

    /// Plugin responsible for `event_name`
    pub fn find_plugin(&self, event_name: &str) -> Result<Rc<dyn EventManagerPlugin>> {
        if let Some(plugin) = self.resolved.borrow().get(event_name) {
            return Ok(Rc::clone(plugin));
        }

        let plugin = self
            .plugins
            .iter()
            .find(|p| p.supports(event_name))
            .cloned()
            .ok_or_else(|| RenderError::NoEventPlugin(event_name.to_string()))?;
        debug!("event {} handled by plugin {}", event_name, plugin.name());
        self.resolved.borrow_mut().insert(event_name.to_string(), Rc::clone(&plugin));
        Ok(plugin)
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("EventManager").field("plugins", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Named {
        name: &'static str,
        claims: &'static [&'static str],
        catch_all: bool,
        lookups: Cell<usize>,
    }

    impl Named {
        fn new(name: &'static str, claims: &'static [&'static str], catch_all: bool) -> Rc<Self> {
            Rc::new(Self {
                name,
                claims,
                catch_all,
                lookups: Cell::new(0),
            })
        }
    }

    impl EventManagerPlugin for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, event_name: &str) -> bool {
            self.lookups.set(self.lookups.get() + 1);
            self.catch_all || self.claims.contains(&event_name)
        }

        fn is_catch_all(&self) -> bool {
            self.catch_all
        }

        fn add_event_listener(
            &self,
            _: NodeId,
            _: &str,
            _: Listener,
            _: ListenerOptions,
        ) -> DetachFn {
            Box::new(|| {})
        }
    }

    #[test]
    fn test_catch_all_moves_last() {
        let plugins: Vec<Rc<dyn EventManagerPlugin>> = vec![
            Named::new("dom", &[], true),
            Named::new("keys", &["keydown.enter"], false),
            Named::new("hammer", &["swipe"], false),
        ];
        let manager = EventManager::new(plugins);
        let order: Vec<&str> = manager.plugins().iter().map(|p| p.name()).collect();
        assert_eq!(order, vec!["hammer", "keys", "dom"]);
        assert_eq!(manager.find_plugin("swipe").unwrap().name(), "hammer");
        assert_eq!(manager.find_plugin("click").unwrap().name(), "dom");
    }

    #[test]
    fn test_later_plugin_overrides_earlier_for_same_event() {
        let first = Named::new("first", &["swipe"], false);
        let second = Named::new("second", &["swipe"], false);
        let plugins: Vec<Rc<dyn EventManagerPlugin>> =
            vec![first.clone(), second, Named::new("dom", &[], true)];
        let manager = EventManager::new(plugins);

        let order: Vec<&str> = manager.plugins().iter().map(|p| p.name()).collect();
        assert_eq!(order, vec!["second", "first", "dom"]);
        assert_eq!(manager.find_plugin("swipe").unwrap().name(), "second");
        assert_eq!(first.lookups.get(), 0);
    }

    #[test]
    fn test_resolution_is_memoized() {
        let keys = Named::new("keys", &["keydown.enter"], false);
        let plugins: Vec<Rc<dyn EventManagerPlugin>> =
            vec![keys.clone(), Named::new("dom", &[], true)];
        let manager = EventManager::new(plugins);
        manager.find_plugin("keydown.enter").unwrap();
        manager.find_plugin("keydown.enter").unwrap();
        assert_eq!(keys.lookups.get(), 1);
    }

    #[test]
    fn test_no_plugin_is_lookup_error() {
        let plugins: Vec<Rc<dyn EventManagerPlugin>> =
            vec![Named::new("keys", &["keydown.enter"], false)];
        let manager = EventManager::new(plugins);
        let err = manager.find_plugin("click").err().unwrap();
        assert!(matches!(err, RenderError::NoEventPlugin(ref name) if name == "click"));
    }
}
