//! Event plumbing
//!
//! The event manager picks a plugin per event name; the renderer wraps every
//! handler before it reaches a plugin.

mod debug;
mod dom;
mod manager;
mod wrap;

pub use debug::trigger_event_handler;
pub use dom::DomEventsPlugin;
pub use manager::{EventManager, EventManagerPlugin};
pub use wrap::{decorate_prevent_default, TracingService};

/// One-shot callback removing a listener registration
pub type DetachFn = Box<dyn FnOnce()>;
