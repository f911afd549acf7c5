//! Shadow DOM renderers
//!
//! A shadow renderer owns the shadow root it attaches to its host. Standard
//! roots get their styles written directly and, for compatibility, join the
//! broadcast group. Isolated roots receive styles only through targeted
//! registration with the shared styles host.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{NodeId, ShadowRootMode};
use tracing::debug;

use super::StyleContext;
use crate::component::{ComponentDescriptor, Encapsulation};
use crate::error::{RenderError, Result};
use crate::scope::StyleScopeRegistry;
use crate::styles::shim::{add_base_href_to_css_source_map, shim_styles_content};
use crate::styles::SharedStylesHost;

pub struct ShadowRenderer {
    host: NodeId,
    shadow_root: NodeId,
    isolated: bool,
    shared_styles: Rc<RefCell<SharedStylesHost>>,
    scope: Rc<RefCell<StyleScopeRegistry>>,
}

impl ShadowRenderer {
    pub(crate) fn new(
        ctx: &StyleContext,
        host: NodeId,
        component: &ComponentDescriptor,
    ) -> Result<Self> {
        if ctx.config.server_mode {
            return Err(RenderError::ServerModeShadowRoot);
        }
        let shadow_root = ctx.document.borrow_mut().attach_shadow(host, ShadowRootMode::Open)?;
        let isolated = component.encapsulation == Encapsulation::IsolatedShadowDom;

        if isolated {
            ctx.shared_styles.borrow_mut().add_shadow_root(shadow_root)?;
            ctx.scope.borrow_mut().register_isolated(shadow_root, host);
        } else {
            ctx.scope.borrow_mut().register_standard(shadow_root, host);
            if ctx.config.legacy_shadow_dom_broadcast {
                ctx.shared_styles.borrow_mut().add_host(shadow_root)?;
            }
        }

        let mut styles = component.styles.clone();
        if ctx.config.dev_mode {
            let base_href = ctx.document.borrow().base_href();
            styles = add_base_href_to_css_source_map(base_href.as_deref(), styles);
        }

        if isolated {
            ctx.shared_styles.borrow_mut().add_styles(
                &styles,
                &component.external_styles,
                Some(shadow_root),
            )?;
        } else {
            let nonce = ctx.config.nonce.as_deref();
            let mut doc = ctx.document.borrow_mut();
            for style in shim_styles_content(&component.id, &styles) {
                let node = doc.create_element("style");
                if let Some(nonce) = nonce {
                    doc.set_attribute(node, "nonce", nonce);
                }
                doc.set_text_content(node, &style);
                doc.append_child(shadow_root, node)?;
            }
            for url in &component.external_styles {
                let node = doc.create_element("link");
                doc.set_attribute(node, "rel", "stylesheet");
                doc.set_attribute(node, "href", url);
                if let Some(nonce) = nonce {
                    doc.set_attribute(node, "nonce", nonce);
                }
                doc.append_child(shadow_root, node)?;
            }
        }

        debug!("shadow renderer for {} (isolated: {}) on {:?}", component.id, isolated, host);
        Ok(Self {
            host,
            shadow_root,
            isolated,
            shared_styles: Rc::clone(&ctx.shared_styles),
            scope: Rc::clone(&ctx.scope),
        })
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn shadow_root(&self) -> NodeId {
        self.shadow_root
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    /// Operations addressed to the host land in its shadow root
    pub(crate) fn node_or_shadow_root(&self, node: NodeId) -> NodeId {
        if node == self.host { self.shadow_root } else { node }
    }

    /// Deregister the shadow root; a no-op once deregistered
    pub fn destroy(&self) -> Result<()> {
        let root = self.shadow_root;
        let (isolated, standard) = {
            let scope = self.scope.borrow();
            (scope.is_isolated(root), scope.is_standard(root))
        };
        if isolated {
            self.scope.borrow_mut().deregister_isolated(root);
            self.shared_styles.borrow_mut().remove_shadow_root(root)?;
        } else if standard {
            self.scope.borrow_mut().deregister_standard(root);
            self.shared_styles.borrow_mut().remove_host(root);
        }
        Ok(())
    }
}
