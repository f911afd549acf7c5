//! fOS Platform - DOM rendering and style encapsulation
//!
//! Turns renderer instructions (create element, set attribute, listen) into
//! mutations of a [`fos_dom::Document`] and decides where component style
//! sheets live:
//! - [`SharedStylesHost`] reference-counts style nodes per style root
//! - [`StyleScopeRegistry`] resolves which shadow roots scope an element
//! - [`RendererFactory`] builds and caches [`DomRenderer`]s per component
//! - [`EventManager`] routes listener registration through plugins
//!
//! # Example
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use fos_dom::Document;
//! use fos_platform::{
//!     ComponentDescriptor, Encapsulation, Renderer, RendererConfig, RendererFactory,
//! };
//!
//! let document = Rc::new(RefCell::new(Document::default()));
//! let factory = RendererFactory::for_document(Rc::clone(&document), RendererConfig::default());
//!
//! let host = document.borrow_mut().create_element("app-card");
//! let card = ComponentDescriptor::new("card", Encapsulation::Emulated)
//!     .with_styles(["p[_ngcontent-%COMP%]{margin:0}"]);
//! let renderer = factory.create_renderer(Some(host), Some(&card)).unwrap();
//!
//! let p = renderer.create_element("p", None);
//! renderer.append_child(host, p).unwrap();
//! assert!(document.borrow().has_attribute(p, "_ngcontent-ng-card"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::Document;

pub mod component;
pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod renderer;
pub mod scope;
pub mod styles;

pub use component::{ComponentDescriptor, Encapsulation};
pub use config::RendererConfig;
pub use error::{ErrorKind, RenderError, Result, SyntheticKind};
pub use events::{
    DetachFn, DomEventsPlugin, EventManager, EventManagerPlugin, TracingService,
    decorate_prevent_default, trigger_event_handler,
};
pub use factory::RendererFactory;
pub use renderer::{
    DomRenderer, LeavingAnimations, ListenTarget, NoLeavingAnimations, Renderer, RendererKind,
    RootSelector, StyleFlags,
};
pub use scope::StyleScopeRegistry;
pub use styles::{SharedStylesHost, StyleKind};

/// Shared handle to the host document
pub type DocumentRef = Rc<RefCell<Document>>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
