//! Style target resolution across shadow roots and logical views

use fos_dom::{Document, NodeId, ShadowRootMode};
use fos_platform::StyleScopeRegistry;

fn shadow_host(doc: &mut Document, parent: NodeId, tag: &str) -> (NodeId, NodeId) {
    let host = doc.create_element(tag);
    doc.append_child(parent, host).unwrap();
    let root = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    (host, root)
}

struct Page {
    doc: Document,
    registry: StyleScopeRegistry,
    iso_host: NodeId,
    iso: NodeId,
    a: NodeId,
    b: NodeId,
}

/// One isolated root and two standard roots under `<body>`
fn page() -> Page {
    let mut doc = Document::new("https://example.com/");
    let body = doc.body();
    let (iso_host, iso) = shadow_host(&mut doc, body, "app-iso");
    let (a_host, a) = shadow_host(&mut doc, body, "app-a");
    let (b_host, b) = shadow_host(&mut doc, body, "app-b");

    let mut registry = StyleScopeRegistry::new();
    registry.register_isolated(iso, iso_host);
    registry.register_standard(a, a_host);
    registry.register_standard(b, b_host);
    Page { doc, registry, iso_host, iso, a, b }
}

#[test]
fn test_element_in_isolated_root() {
    let mut page = page();
    let el = page.doc.create_element("span");
    page.doc.append_child(page.iso, el).unwrap();
    assert_eq!(page.registry.determine_style_targets(&page.doc, el), vec![page.iso]);
}

#[test]
fn test_element_in_standard_root_targets_every_standard_root() {
    let mut page = page();
    let el = page.doc.create_element("span");
    page.doc.append_child(page.a, el).unwrap();
    assert_eq!(page.registry.determine_style_targets(&page.doc, el), vec![page.a, page.b]);
}

#[test]
fn test_light_dom_element_broadcasts() {
    let mut page = page();
    let el = page.doc.create_element("span");
    let body = page.doc.body();
    page.doc.append_child(body, el).unwrap();
    assert!(page.registry.determine_style_targets(&page.doc, el).is_empty());
}

#[test]
fn test_detached_element_resolves_through_owner_view() {
    let mut page = page();
    let view = page.doc.create_view(Some(page.iso_host), None);
    let el = page.doc.create_element("app-child");
    page.doc.attach_to_view(el, view);
    assert_eq!(page.registry.determine_style_targets(&page.doc, el), vec![page.iso]);
}

#[test]
fn test_projected_content_follows_logical_owner() {
    let mut page = page();
    // A plain component rendered by the isolated component's template
    let outer = page.doc.create_view(Some(page.iso_host), None);
    let wrapper_host = page.doc.create_element("app-wrapper");
    let wrapper = page.doc.create_view(Some(wrapper_host), Some(outer));

    // Content projected into the wrapper lives in the light DOM of the body
    let projected = page.doc.create_element("p");
    let body = page.doc.body();
    page.doc.append_child(body, projected).unwrap();
    page.doc.attach_to_view(projected, wrapper);

    assert_eq!(page.registry.determine_style_targets(&page.doc, projected), vec![page.iso]);
}

#[test]
fn test_unregistered_shadow_root_uses_owner_chain() {
    let mut page = page();
    let body = page.doc.body();
    let (_, stray) = shadow_host(&mut page.doc, body, "app-stray");
    let el = page.doc.create_element("span");
    page.doc.append_child(stray, el).unwrap();
    assert!(page.registry.determine_style_targets(&page.doc, el).is_empty());

    let view = page.doc.create_view(Some(page.iso_host), None);
    page.doc.attach_to_view(el, view);
    assert_eq!(page.registry.determine_style_targets(&page.doc, el), vec![page.iso]);
}

#[test]
fn test_deregistered_root_no_longer_targeted() {
    let mut page = page();
    let el = page.doc.create_element("span");
    page.doc.append_child(page.b, el).unwrap();
    page.registry.deregister_standard(page.a);
    assert_eq!(page.registry.determine_style_targets(&page.doc, el), vec![page.b]);

    page.registry.deregister_standard(page.b);
    assert!(page.registry.determine_style_targets(&page.doc, el).is_empty());
}

#[test]
fn test_no_shadow_dom_support() {
    let mut doc = Document::without_shadow_dom("https://example.com/");
    let el = doc.create_element("span");
    let mut registry = StyleScopeRegistry::new();
    let body = doc.body();
    registry.register_standard(body, body);
    assert!(registry.determine_style_targets(&doc, el).is_empty());
}
