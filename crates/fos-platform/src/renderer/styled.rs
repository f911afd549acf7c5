//! Renderers sharing styles through the shared styles host

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::NodeId;
use tracing::debug;

use super::StyleContext;
use crate::component::ComponentDescriptor;
use crate::error::Result;
use crate::scope::StyleScopeRegistry;
use crate::styles::shim::{
    add_base_href_to_css_source_map, shim_content_attribute, shim_host_attribute,
    shim_styles_content,
};
use crate::styles::SharedStylesHost;
use crate::DocumentRef;

/// Reports whether leaving animations are still running. Style removal on
/// component destroy is skipped while any are pending.
pub trait LeavingAnimations {
    fn pending(&self) -> usize;
}

/// No animation subsystem: nothing is ever pending
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLeavingAnimations;

impl LeavingAnimations for NoLeavingAnimations {
    fn pending(&self) -> usize {
        0
    }
}

/// Style registration for components without shadow roots
pub struct StyledRenderer {
    document: DocumentRef,
    shared_styles: Rc<RefCell<SharedStylesHost>>,
    scope: Rc<RefCell<StyleScopeRegistry>>,
    animations: Rc<dyn LeavingAnimations>,
    styles: Vec<String>,
    style_urls: Vec<String>,
    remove_styles_on_destroy: bool,
    server_mode: bool,
}

impl StyledRenderer {
    /// `component_id` is the shimming identifier; `None` keeps styles raw
    pub(crate) fn new(
        ctx: &StyleContext,
        component: &ComponentDescriptor,
        component_id: Option<&str>,
    ) -> Self {
        let mut styles = component.styles.clone();
        if ctx.config.dev_mode {
            let base_href = ctx.document.borrow().base_href();
            styles = add_base_href_to_css_source_map(base_href.as_deref(), styles);
        }
        let styles = match component_id {
            Some(id) => shim_styles_content(id, &styles),
            None => styles,
        };

        Self {
            document: Rc::clone(&ctx.document),
            shared_styles: Rc::clone(&ctx.shared_styles),
            scope: Rc::clone(&ctx.scope),
            animations: Rc::clone(&ctx.animations),
            styles,
            style_urls: component.external_styles.clone(),
            remove_styles_on_destroy: ctx.config.remove_styles_on_component_destroy,
            server_mode: ctx.config.server_mode,
        }
    }

    /// Style sheets as registered, after shimming
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn style_urls(&self) -> &[String] {
        &self.style_urls
    }

    /// Register styles for a host attachment: into the shadow roots that
    /// scope `element`, or broadcast when none does
    pub fn apply_styles(&self, element: Option<NodeId>) -> Result<()> {
        if let Some(element) = element.filter(|_| !self.server_mode) {
            let targets = self
                .scope
                .borrow()
                .determine_style_targets(&self.document.borrow(), element);
            if !targets.is_empty() {
                let mut shared = self.shared_styles.borrow_mut();
                for target in targets {
                    shared.add_styles(&self.styles, &self.style_urls, Some(target))?;
                }
                return Ok(());
            }
        }
        self.shared_styles.borrow_mut().add_styles(&self.styles, &self.style_urls, None)
    }

    /// Release one usage of the component styles.
    ///
    /// Removal always takes the broadcast form: usages registered against
    /// scoped targets by [`apply_styles`](Self::apply_styles) stay in those
    /// roots, and the head record is decremented even when this host never
    /// added to it.
    pub fn destroy(&self) {
        if !self.remove_styles_on_destroy {
            return;
        }
        if self.animations.pending() > 0 {
            debug!("keeping component styles while leaving animations run");
            return;
        }
        self.shared_styles.borrow_mut().remove_styles(&self.styles, &self.style_urls, None);
    }
}

/// Emulated encapsulation: shimmed styles plus generated scoping attributes
pub struct EmulatedRenderer {
    pub(crate) styled: StyledRenderer,
    content_attr: String,
    host_attr: String,
}

impl EmulatedRenderer {
    pub(crate) fn new(ctx: &StyleContext, component: &ComponentDescriptor) -> Self {
        let component_id = format!("{}-{}", ctx.config.app_id, component.id);
        Self {
            styled: StyledRenderer::new(ctx, component, Some(&component_id)),
            content_attr: shim_content_attribute(&component_id),
            host_attr: shim_host_attribute(&component_id),
        }
    }

    /// Attribute stamped on every element the component creates
    pub fn content_attr(&self) -> &str {
        &self.content_attr
    }

    /// Attribute stamped on the component host
    pub fn host_attr(&self) -> &str {
        &self.host_attr
    }
}
