//! Example: render two components and print the resulting document

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{Document, Event, ListenerOptions};
use fos_platform::{ComponentDescriptor, Encapsulation, Renderer, RendererConfig, RendererFactory};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
app_id = "demo"
nonce = "r4nd0m"
"#;

fn main() -> anyhow::Result<()> {
    // RUST_LOG=fos_platform=debug shows style registration
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = RendererConfig::from_toml_str(CONFIG)?;
    let document = Rc::new(RefCell::new(Document::new("https://example.com/")));
    let factory = RendererFactory::for_document(Rc::clone(&document), config);

    let root = factory.create_renderer(None, None)?;
    let app = root.create_element("app-root", None);
    let body = document.borrow().body();
    root.append_child(body, app)?;

    let card = ComponentDescriptor::new("card", Encapsulation::Emulated)
        .with_styles(["[_nghost-%COMP%]{display:block} button[_ngcontent-%COMP%]{color:green}"]);
    let card_renderer = factory.create_renderer(Some(app), Some(&card))?;
    let button = card_renderer.create_element("button", None);
    let label = card_renderer.create_text("Save");
    card_renderer.append_child(button, label)?;
    card_renderer.append_child(app, button)?;
    let _detach = card_renderer.listen(
        button.into(),
        "click",
        Rc::new(|_: &mut Event| {
            println!("saved");
            Some(false)
        }),
        ListenerOptions::default(),
    )?;

    let panel_host = root.create_element("app-panel", None);
    root.append_child(body, panel_host)?;
    let panel = ComponentDescriptor::new("panel", Encapsulation::ShadowDom)
        .with_styles([":host{margin:8px}"]);
    let panel_renderer = factory.create_renderer(Some(panel_host), Some(&panel))?;
    let heading = panel_renderer.create_element("h2", None);
    let title = panel_renderer.create_text("Panel");
    panel_renderer.append_child(heading, title)?;
    panel_renderer.append_child(panel_host, heading)?;

    println!("fOS Platform v{}", fos_platform::VERSION);
    let html = document.borrow().outer_html(document.borrow().document_element());
    println!("{html}");

    let mut click = Event::new("click");
    fos_dom::dispatch_event(&document, button, &mut click);
    println!("default prevented: {}", click.is_default_prevented());

    panel_renderer.destroy()?;
    card_renderer.destroy()?;
    Ok(())
}
