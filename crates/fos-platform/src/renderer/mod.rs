//! DOM renderers
//!
//! Every renderer shares the same primitive operations ([`BaseRenderer`]);
//! the encapsulation mode is a [`RendererKind`] chosen once at construction
//! and only changes style placement, element scoping attributes and the
//! host-to-shadow-root redirection of shadow renderers.

mod base;
mod shadow;
mod styled;

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{Handler, ListenerOptions, NodeId, PropertyValue};
use tracing::debug;

pub use base::{namespace_uri, BaseRenderer, NAMESPACE_URIS};
pub use shadow::ShadowRenderer;
pub use styled::{EmulatedRenderer, LeavingAnimations, NoLeavingAnimations, StyledRenderer};

use crate::component::{ComponentDescriptor, Encapsulation};
use crate::config::RendererConfig;
use crate::error::Result;
use crate::events::DetachFn;
use crate::scope::StyleScopeRegistry;
use crate::styles::SharedStylesHost;
use crate::DocumentRef;

/// Style flags for `set_style` / `remove_style`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleFlags(u8);

impl StyleFlags {
    /// Plain camelCase property
    pub const NONE: Self = Self(0);
    /// Property name is already dash-case
    pub const DASH_CASE: Self = Self(1 << 0);
    /// Mark the declaration `!important`
    pub const IMPORTANT: Self = Self(1 << 1);

    #[inline]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for StyleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl Default for StyleFlags {
    fn default() -> Self {
        Self::NONE
    }
}

/// Listener target: a node, or a global target by name
/// (`window`, `document`, `body`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget<'a> {
    Node(NodeId),
    Global(&'a str),
}

impl From<NodeId> for ListenTarget<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a str> for ListenTarget<'a> {
    fn from(name: &'a str) -> Self {
        Self::Global(name)
    }
}

/// Root element lookup: by selector, or an existing node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSelector<'a> {
    Selector(&'a str),
    Node(NodeId),
}

impl From<NodeId> for RootSelector<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a str> for RootSelector<'a> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

/// The primitive operations a template interpreter drives
pub trait Renderer {
    /// Release everything this renderer registered
    fn destroy(&self) -> Result<()>;

    fn create_element(&self, name: &str, namespace: Option<&str>) -> NodeId;
    fn create_comment(&self, value: &str) -> NodeId;
    fn create_text(&self, value: &str) -> NodeId;

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()>;
    fn insert_before(
        &self,
        parent: Option<NodeId>,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()>;
    fn remove_child(&self, parent: Option<NodeId>, child: NodeId);

    fn select_root_element(
        &self,
        selector: RootSelector<'_>,
        preserve_content: bool,
    ) -> Result<NodeId>;
    fn parent_node(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn set_attribute(&self, el: NodeId, name: &str, value: &str, namespace: Option<&str>);
    fn remove_attribute(&self, el: NodeId, name: &str, namespace: Option<&str>);
    fn add_class(&self, el: NodeId, name: &str);
    fn remove_class(&self, el: NodeId, name: &str);
    fn set_style(&self, el: NodeId, style: &str, value: &str, flags: StyleFlags);
    fn remove_style(&self, el: NodeId, style: &str, flags: StyleFlags);
    fn set_property(&self, el: NodeId, name: &str, value: PropertyValue) -> Result<()>;
    fn set_value(&self, node: NodeId, value: &str);

    fn listen(
        &self,
        target: ListenTarget<'_>,
        event_name: &str,
        handler: Handler,
        options: ListenerOptions,
    ) -> Result<DetachFn>;
}

/// Encapsulation-specific renderer state
pub enum RendererKind {
    /// Renderer used when no component type is known
    Default,
    /// `Encapsulation::None`
    Styled(StyledRenderer),
    Emulated(EmulatedRenderer),
    /// `ShadowDom` and `IsolatedShadowDom`
    Shadow(ShadowRenderer),
}

/// Collaborators shared by every styled renderer a factory builds
#[derive(Clone)]
pub(crate) struct StyleContext {
    pub(crate) document: DocumentRef,
    pub(crate) shared_styles: Rc<RefCell<SharedStylesHost>>,
    pub(crate) scope: Rc<RefCell<StyleScopeRegistry>>,
    pub(crate) config: Rc<RendererConfig>,
    pub(crate) animations: Rc<dyn LeavingAnimations>,
}

/// A renderer: shared primitive operations plus its encapsulation kind
pub struct DomRenderer {
    base: BaseRenderer,
    kind: RendererKind,
}

impl DomRenderer {
    pub fn new(base: BaseRenderer, kind: RendererKind) -> Self {
        Self { base, kind }
    }

    pub(crate) fn for_component(
        base: BaseRenderer,
        ctx: &StyleContext,
        host: NodeId,
        component: &ComponentDescriptor,
        encapsulation: Encapsulation,
    ) -> Result<Self> {
        let kind = match encapsulation {
            Encapsulation::None => RendererKind::Styled(StyledRenderer::new(ctx, component, None)),
            Encapsulation::Emulated => {
                RendererKind::Emulated(EmulatedRenderer::new(ctx, component))
            }
            Encapsulation::ShadowDom | Encapsulation::IsolatedShadowDom => {
                RendererKind::Shadow(ShadowRenderer::new(ctx, host, component)?)
            }
        };
        debug!("created {:?} renderer for component {}", encapsulation, component.id);
        Ok(Self::new(base, kind))
    }

    pub fn kind(&self) -> &RendererKind {
        &self.kind
    }

    /// Encapsulation this renderer implements; `None` for the default renderer
    pub fn encapsulation(&self) -> Option<Encapsulation> {
        match &self.kind {
            RendererKind::Default => None,
            RendererKind::Styled(_) => Some(Encapsulation::None),
            RendererKind::Emulated(_) => Some(Encapsulation::Emulated),
            RendererKind::Shadow(shadow) if shadow.is_isolated() => {
                Some(Encapsulation::IsolatedShadowDom)
            }
            RendererKind::Shadow(_) => Some(Encapsulation::ShadowDom),
        }
    }

    /// Shadow root owned by a shadow renderer
    pub fn shadow_root(&self) -> Option<NodeId> {
        match &self.kind {
            RendererKind::Shadow(shadow) => Some(shadow.shadow_root()),
            _ => None,
        }
    }

    pub fn base(&self) -> &BaseRenderer {
        &self.base
    }

    /// Disable the synthetic-name check, for wrappers that handle animation
    /// properties themselves
    pub fn set_throw_on_synthetic_props(&self, enabled: bool) {
        self.base.set_throw_on_synthetic_props(enabled);
    }

    /// Style side effect of attaching this renderer to `host`
    pub fn attach_host(&self, host: NodeId) -> Result<()> {
        match &self.kind {
            RendererKind::Default | RendererKind::Shadow(_) => Ok(()),
            RendererKind::Styled(styled) => styled.apply_styles(Some(host)),
            RendererKind::Emulated(emulated) => {
                emulated.styled.apply_styles(Some(host))?;
                self.base.set_attribute(host, emulated.host_attr(), "", None);
                Ok(())
            }
        }
    }

    fn redirect(&self, node: NodeId) -> NodeId {
        match &self.kind {
            RendererKind::Shadow(shadow) => shadow.node_or_shadow_root(node),
            _ => node,
        }
    }
}

impl Renderer for DomRenderer {
    fn destroy(&self) -> Result<()> {
        match &self.kind {
            RendererKind::Default => Ok(()),
            RendererKind::Styled(styled) => {
                styled.destroy();
                Ok(())
            }
            RendererKind::Emulated(emulated) => {
                emulated.styled.destroy();
                Ok(())
            }
            RendererKind::Shadow(shadow) => shadow.destroy(),
        }
    }

    fn create_element(&self, name: &str, namespace: Option<&str>) -> NodeId {
        let el = self.base.create_element(name, namespace);
        if let RendererKind::Emulated(emulated) = &self.kind {
            self.base.set_attribute(el, emulated.content_attr(), "", None);
        }
        el
    }

    fn create_comment(&self, value: &str) -> NodeId {
        self.base.create_comment(value)
    }

    fn create_text(&self, value: &str) -> NodeId {
        self.base.create_text(value)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.base.append_child(self.redirect(parent), child)
    }

    fn insert_before(
        &self,
        parent: Option<NodeId>,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        self.base.insert_before(parent.map(|p| self.redirect(p)), child, reference)
    }

    fn remove_child(&self, _parent: Option<NodeId>, child: NodeId) {
        self.base.remove_child(child);
    }

    fn select_root_element(
        &self,
        selector: RootSelector<'_>,
        preserve_content: bool,
    ) -> Result<NodeId> {
        self.base.select_root_element(selector, preserve_content)
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.base.parent_node(self.redirect(node)).map(|parent| self.redirect(parent))
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.base.next_sibling(node)
    }

    fn set_attribute(&self, el: NodeId, name: &str, value: &str, namespace: Option<&str>) {
        self.base.set_attribute(el, name, value, namespace);
    }

    fn remove_attribute(&self, el: NodeId, name: &str, namespace: Option<&str>) {
        self.base.remove_attribute(el, name, namespace);
    }

    fn add_class(&self, el: NodeId, name: &str) {
        self.base.add_class(el, name);
    }

    fn remove_class(&self, el: NodeId, name: &str) {
        self.base.remove_class(el, name);
    }

    fn set_style(&self, el: NodeId, style: &str, value: &str, flags: StyleFlags) {
        self.base.set_style(el, style, value, flags);
    }

    fn remove_style(&self, el: NodeId, style: &str, flags: StyleFlags) {
        self.base.remove_style(el, style, flags);
    }

    fn set_property(&self, el: NodeId, name: &str, value: PropertyValue) -> Result<()> {
        self.base.set_property(el, name, value)
    }

    fn set_value(&self, node: NodeId, value: &str) {
        self.base.set_value(node, value);
    }

    fn listen(
        &self,
        target: ListenTarget<'_>,
        event_name: &str,
        handler: Handler,
        options: ListenerOptions,
    ) -> Result<DetachFn> {
        self.base.listen(target, event_name, handler, options)
    }
}

impl std::fmt::Debug for DomRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomRenderer")
            .field("encapsulation", &self.encapsulation())
            .field("shadow_root", &self.shadow_root())
            .finish()
    }
}
