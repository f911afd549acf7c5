//! Platform errors
//!
//! Every failure is a programmer or configuration error raised synchronously
//! at the call site; nothing here is retried.

use fos_dom::DomError;

/// Result type used across the platform
pub type Result<T> = std::result::Result<T, RenderError>;

/// Broad error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A name or setting requires a subsystem that is not enabled
    Configuration,
    /// Something looked up by name does not exist
    Lookup,
    /// The host environment cannot do what was asked
    Environment,
}

/// Rendering and style-management errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(
        "unexpected synthetic {kind} {name} found; make sure an animation module is enabled \
         and that an animation named `{name}` is declared by the component"
    )]
    SyntheticProperty { kind: SyntheticKind, name: String },

    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("no event manager plugin found for event {0}")]
    NoEventPlugin(String),

    #[error("the selector \"{0}\" did not match any elements")]
    RootNotFound(String),

    #[error("unsupported event target {target} for event {event}")]
    UnsupportedEventTarget { target: String, event: String },

    #[error("shadow roots are not supported in this environment")]
    ShadowDomUnsupported,

    #[error("isolated shadow roots are not supported in server rendering mode")]
    ServerModeShadowRoot,

    #[error("shadow root is already registered")]
    ShadowRootAlreadyRegistered,

    #[error("attempted to remove a shadow root that was not previously added")]
    ShadowRootNotRegistered,

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Whether a synthetic name was used as a property or as a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticKind {
    Property,
    Listener,
}

impl std::fmt::Display for SyntheticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property => write!(f, "property"),
            Self::Listener => write!(f, "listener"),
        }
    }
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SyntheticProperty { .. } | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::NoEventPlugin(_)
            | Self::RootNotFound(_)
            | Self::UnsupportedEventTarget { .. } => ErrorKind::Lookup,
            Self::ShadowDomUnsupported
            | Self::ServerModeShadowRoot
            | Self::ShadowRootAlreadyRegistered
            | Self::ShadowRootNotRegistered => ErrorKind::Environment,
            Self::Dom(DomError::InvalidSelector(_)) => ErrorKind::Lookup,
            Self::Dom(_) => ErrorKind::Environment,
        }
    }
}
