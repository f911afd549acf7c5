//! Component descriptors
//!
//! The compiled, renderer-facing view of a component type.

/// Where a component's styles live and how its DOM is scoped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encapsulation {
    /// Styles shimmed with generated attributes
    #[default]
    Emulated,
    /// Global styles, no scoping
    None,
    /// Native shadow root; styles also leak into the broadcast group
    ShadowDom,
    /// Native shadow root with strictly scoped styles
    IsolatedShadowDom,
}

impl Encapsulation {
    pub fn uses_shadow_root(self) -> bool {
        matches!(self, Self::ShadowDom | Self::IsolatedShadowDom)
    }
}

/// Renderer type information for one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub id: String,
    pub encapsulation: Encapsulation,
    /// Inline style sheets, possibly containing `%COMP%`
    pub styles: Vec<String>,
    /// Style sheet URLs
    pub external_styles: Vec<String>,
}

impl ComponentDescriptor {
    pub fn new(id: impl Into<String>, encapsulation: Encapsulation) -> Self {
        Self {
            id: id.into(),
            encapsulation,
            styles: Vec::new(),
            external_styles: Vec::new(),
        }
    }

    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles.extend(styles.into_iter().map(Into::into));
        self
    }

    pub fn with_external_styles<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_styles.extend(urls.into_iter().map(Into::into));
        self
    }
}
