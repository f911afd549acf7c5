//! Comprehensive tests for fos-dom
//!
//! Tree structure, shadow trees, ownership views and serialization working
//! together.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fos_dom::{
    Document, Event, ListenerArg, ListenerOptions, ShadowRootMode, dispatch_event, listener_fn,
};

#[test]
fn test_dom_tree_creation() {
    let mut doc = Document::new("https://example.com/");

    // div > span > text
    let div = doc.create_element("div");
    let span = doc.create_element("span");
    let text = doc.create_text("Hello, World!");
    doc.append_child(doc.body(), div).unwrap();
    doc.append_child(div, span).unwrap();
    doc.append_child(span, text).unwrap();

    assert_eq!(doc.parent_node(div), Some(doc.body()));
    assert_eq!(doc.parent_node(text), Some(span));
    assert_eq!(doc.text_content(div), "Hello, World!");
    assert_eq!(doc.outer_html(div), "<div><span>Hello, World!</span></div>");
}

#[test]
fn test_projected_content_keeps_dom_position_but_not_owner() {
    let mut doc = Document::default();

    // <outer-comp> projects a <button> that its parent template created
    let app_host = doc.create_element("app-root");
    let outer_host = doc.create_element("outer-comp");
    doc.append_child(doc.body(), app_host).unwrap();
    doc.append_child(app_host, outer_host).unwrap();

    let app_view = doc.create_view(Some(app_host), None);
    doc.create_view(Some(outer_host), Some(app_view));

    let button = doc.create_element("button");
    doc.attach_to_view(button, app_view);
    doc.append_child(outer_host, button).unwrap();

    // DOM parent is the outer component, logical owner is the app
    assert_eq!(doc.parent_node(button), Some(outer_host));
    assert_eq!(doc.owner_hosts(button), vec![app_host]);
}

#[test]
fn test_shadow_tree_serialization() {
    let mut doc = Document::default();
    let host = doc.create_element("my-comp");
    doc.append_child(doc.body(), host).unwrap();
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    let style = doc.create_element("style");
    doc.set_text_content(style, "p{color:red}");
    doc.append_child(shadow, style).unwrap();

    assert_eq!(
        doc.inner_html(doc.body()),
        "<my-comp><template shadowrootmode=\"open\"><style>p{color:red}</style></template></my-comp>"
    );
    // Shadow content is invisible to document queries
    assert_eq!(doc.query_selector("style").unwrap(), None);
}

#[test]
fn test_listener_unwrap_request() {
    let doc = RefCell::new(Document::default());
    let body = doc.borrow().body();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);

    let listener = listener_fn(move |_| counter.set(counter.get() + 1));
    doc.borrow_mut().add_event_listener(body, "click", listener, ListenerOptions::default());

    // Plain listeners have nothing to unwrap and are not run by the request
    let registered = doc.borrow().event_listeners(body, "click");
    assert_eq!(registered.len(), 1);
    assert!(registered[0](ListenerArg::Unwrap).is_none());
    assert_eq!(calls.get(), 0);

    dispatch_event(&doc, body, &mut Event::new("click"));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_remove_event_listener() {
    let mut doc = Document::default();
    let body = doc.body();
    let id = doc.add_event_listener(body, "click", listener_fn(|_| {}), ListenerOptions::default());

    assert!(doc.remove_event_listener(body, id));
    assert!(!doc.remove_event_listener(body, id));
    assert!(doc.event_listeners(body, "click").is_empty());
}
