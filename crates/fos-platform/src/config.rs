//! Renderer Configuration

use serde::Deserialize;

use crate::error::Result;

/// Platform-wide renderer options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Application identifier used in generated attributes and server markup
    pub app_id: String,

    /// CSP nonce stamped on every created style/link node
    pub nonce: Option<String>,

    /// Decrement style usage when a component renderer is destroyed
    pub remove_styles_on_component_destroy: bool,

    /// Non-interactive (server) rendering context
    pub server_mode: bool,

    /// Development mode: source-map rewriting and reuse marking
    pub dev_mode: bool,

    /// Standard shadow boundaries join the head broadcast group
    pub legacy_shadow_dom_broadcast: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            app_id: "ng".to_string(),
            nonce: None,
            remove_styles_on_component_destroy: true,
            server_mode: false,
            dev_mode: cfg!(debug_assertions),
            legacy_shadow_dom_broadcast: true,
        }
    }
}

impl RendererConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.app_id, "ng");
        assert!(config.nonce.is_none());
        assert!(config.remove_styles_on_component_destroy);
        assert!(!config.server_mode);
        assert!(config.legacy_shadow_dom_broadcast);
    }

    #[test]
    fn test_partial_toml() {
        let config = RendererConfig::from_toml_str(
            r#"
            app_id = "shop"
            nonce = "r4nd0m"
            server_mode = true
            "#,
        )
        .unwrap();
        assert_eq!(config.app_id, "shop");
        assert_eq!(config.nonce.as_deref(), Some("r4nd0m"));
        assert!(config.server_mode);
        assert!(config.remove_styles_on_component_destroy);
    }

    #[test]
    fn test_invalid_toml() {
        let err = RendererConfig::from_toml_str("server_mode = \"yes\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
