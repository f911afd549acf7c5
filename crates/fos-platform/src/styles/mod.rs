//! Component style management

mod host;
pub mod shim;
mod store;

pub use host::{SharedStylesHost, APP_ID_ATTRIBUTE_NAME, STYLE_REUSED_ATTRIBUTE_NAME};
pub use store::{OwnedStyleNode, StyleKind, UsageRecord};
