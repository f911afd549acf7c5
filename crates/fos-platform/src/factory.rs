//! Renderer factory
//!
//! Hands out one renderer per component type (shadow renderers excepted,
//! they are bound to a single host) and performs the style registration of
//! every host attachment.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fos_dom::NodeId;
use tracing::debug;

use crate::component::{ComponentDescriptor, Encapsulation};
use crate::config::RendererConfig;
use crate::error::Result;
use crate::events::{DomEventsPlugin, EventManager, EventManagerPlugin, TracingService};
use crate::renderer::{
    BaseRenderer, DomRenderer, LeavingAnimations, NoLeavingAnimations, RendererKind, StyleContext,
};
use crate::scope::StyleScopeRegistry;
use crate::styles::SharedStylesHost;
use crate::DocumentRef;

pub struct RendererFactory {
    ctx: StyleContext,
    event_manager: Rc<EventManager>,
    tracing: Option<Rc<dyn TracingService>>,
    renderer_by_comp_id: RefCell<HashMap<String, Rc<DomRenderer>>>,
    default_renderer: Rc<DomRenderer>,
}

impl RendererFactory {
    pub fn new(
        document: DocumentRef,
        event_manager: Rc<EventManager>,
        shared_styles: Rc<RefCell<SharedStylesHost>>,
        scope: Rc<RefCell<StyleScopeRegistry>>,
        config: RendererConfig,
    ) -> Self {
        let ctx = StyleContext {
            document,
            shared_styles,
            scope,
            config: Rc::new(config),
            animations: Rc::new(NoLeavingAnimations),
        };
        let default_renderer = Rc::new(DomRenderer::new(
            BaseRenderer::new(Rc::clone(&ctx.document), Rc::clone(&event_manager), None),
            RendererKind::Default,
        ));
        Self {
            ctx,
            event_manager,
            tracing: None,
            renderer_by_comp_id: RefCell::new(HashMap::new()),
            default_renderer,
        }
    }

    /// Factory wired with a fresh styles host, scope registry and an event
    /// manager holding only the DOM events plugin
    pub fn for_document(document: DocumentRef, config: RendererConfig) -> Self {
        let shared_styles = Rc::new(RefCell::new(SharedStylesHost::new(
            Rc::clone(&document),
            &config,
        )));
        let plugins: Vec<Rc<dyn EventManagerPlugin>> =
            vec![Rc::new(DomEventsPlugin::new(Rc::clone(&document)))];
        let event_manager = Rc::new(EventManager::new(plugins));
        let scope = Rc::new(RefCell::new(StyleScopeRegistry::new()));
        Self::new(document, event_manager, shared_styles, scope, config)
    }

    /// Re-wrap every listener registered by this factory's renderers
    pub fn with_tracing_service(mut self, tracing: Rc<dyn TracingService>) -> Self {
        self.tracing = Some(tracing);
        self.default_renderer =
            Rc::new(DomRenderer::new(self.base_renderer(), RendererKind::Default));
        self
    }

    /// Consult `animations` before removing styles on component destroy
    pub fn with_leaving_animations(mut self, animations: Rc<dyn LeavingAnimations>) -> Self {
        self.ctx.animations = animations;
        self
    }

    pub fn document(&self) -> &DocumentRef {
        &self.ctx.document
    }

    pub fn config(&self) -> &RendererConfig {
        &self.ctx.config
    }

    pub fn shared_styles(&self) -> &Rc<RefCell<SharedStylesHost>> {
        &self.ctx.shared_styles
    }

    pub fn scope(&self) -> &Rc<RefCell<StyleScopeRegistry>> {
        &self.ctx.scope
    }

    pub fn event_manager(&self) -> &Rc<EventManager> {
        &self.event_manager
    }

    /// Renderer for `component` hosted by `host`.
    ///
    /// Without either, the shared default renderer is returned. Every call
    /// with both registers the component's styles for this host.
    pub fn create_renderer(
        &self,
        host: Option<NodeId>,
        component: Option<&ComponentDescriptor>,
    ) -> Result<Rc<DomRenderer>> {
        let (Some(host), Some(component)) = (host, component) else {
            return Ok(Rc::clone(&self.default_renderer));
        };

        let mut encapsulation = component.encapsulation;
        if self.ctx.config.server_mode && encapsulation.uses_shadow_root() {
            debug!("server mode: rendering {} with emulated encapsulation", component.id);
            encapsulation = Encapsulation::Emulated;
        }

        let renderer = self.get_or_create_renderer(host, component, encapsulation)?;
        renderer.attach_host(host)?;
        Ok(renderer)
    }

    fn get_or_create_renderer(
        &self,
        host: NodeId,
        component: &ComponentDescriptor,
        encapsulation: Encapsulation,
    ) -> Result<Rc<DomRenderer>> {
        if let Some(renderer) = self.renderer_by_comp_id.borrow().get(&component.id) {
            return Ok(Rc::clone(renderer));
        }

        let renderer = Rc::new(DomRenderer::for_component(
            self.base_renderer(),
            &self.ctx,
            host,
            component,
            encapsulation,
        )?);
        if !encapsulation.uses_shadow_root() {
            self.renderer_by_comp_id
                .borrow_mut()
                .insert(component.id.clone(), Rc::clone(&renderer));
        }
        Ok(renderer)
    }

    /// Forget the cached renderer of a replaced component
    pub fn component_replaced(&self, component_id: &str) {
        self.renderer_by_comp_id.borrow_mut().remove(component_id);
    }

    /// Whether a renderer is cached for `component_id`
    pub fn is_cached(&self, component_id: &str) -> bool {
        self.renderer_by_comp_id.borrow().contains_key(component_id)
    }

    pub fn destroy(&self) {
        self.renderer_by_comp_id.borrow_mut().clear();
    }

    fn base_renderer(&self) -> BaseRenderer {
        BaseRenderer::new(
            Rc::clone(&self.ctx.document),
            Rc::clone(&self.event_manager),
            self.tracing.clone(),
        )
    }
}

impl std::fmt::Debug for RendererFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererFactory")
            .field("config", &self.ctx.config)
            .field("cached", &self.renderer_by_comp_id.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    fn factory(config: RendererConfig) -> RendererFactory {
        RendererFactory::for_document(Rc::new(RefCell::new(Document::default())), config)
    }

    fn host(factory: &RendererFactory, tag: &str) -> NodeId {
        let mut doc = factory.document().borrow_mut();
        let el = doc.create_element(tag);
        let body = doc.body();
        doc.append_child(body, el).unwrap();
        el
    }

    #[test]
    fn test_default_renderer_without_type() {
        let factory = factory(RendererConfig::default());
        let a = factory.create_renderer(None, None).unwrap();
        let el = host(&factory, "div");
        let b = factory.create_renderer(Some(el), None).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.encapsulation(), None);
    }

    #[test]
    fn test_renderers_cached_per_component() {
        let factory = factory(RendererConfig::default());
        let component = ComponentDescriptor::new("card", Encapsulation::Emulated);
        let (a, b) = (host(&factory, "app-card"), host(&factory, "app-card"));

        let first = factory.create_renderer(Some(a), Some(&component)).unwrap();
        let second = factory.create_renderer(Some(b), Some(&component)).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        // Both hosts got the host attribute
        let doc = factory.document().borrow();
        assert!(doc.has_attribute(a, "_nghost-ng-card"));
        assert!(doc.has_attribute(b, "_nghost-ng-card"));
    }

    #[test]
    fn test_shadow_renderers_are_not_cached() {
        let factory = factory(RendererConfig::default());
        let component = ComponentDescriptor::new("panel", Encapsulation::ShadowDom);
        let (a, b) = (host(&factory, "app-panel"), host(&factory, "app-panel"));

        let first = factory.create_renderer(Some(a), Some(&component)).unwrap();
        let second = factory.create_renderer(Some(b), Some(&component)).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert!(!factory.is_cached("panel"));
        assert_ne!(first.shadow_root(), second.shadow_root());
    }

    #[test]
    fn test_server_mode_downgrades_shadow() {
        let factory = factory(RendererConfig {
            server_mode: true,
            ..RendererConfig::default()
        });
        let component = ComponentDescriptor::new("panel", Encapsulation::IsolatedShadowDom);
        let el = host(&factory, "app-panel");

        let renderer = factory.create_renderer(Some(el), Some(&component)).unwrap();
        assert_eq!(renderer.encapsulation(), Some(Encapsulation::Emulated));
        assert!(factory.document().borrow().shadow_root(el).is_none());
        assert!(factory.is_cached("panel"));
    }

    #[test]
    fn test_component_replaced_evicts() {
        let factory = factory(RendererConfig::default());
        let component = ComponentDescriptor::new("card", Encapsulation::None);
        let el = host(&factory, "app-card");
        let first = factory.create_renderer(Some(el), Some(&component)).unwrap();

        factory.component_replaced("card");
        assert!(!factory.is_cached("card"));
        let second = factory.create_renderer(Some(el), Some(&component)).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));

        factory.destroy();
        assert!(!factory.is_cached("card"));
    }
}
