//! Style shimming
//!
//! Emulated encapsulation scopes CSS by rewriting a fixed placeholder into a
//! component identifier and stamping matching attributes on the DOM.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

/// Placeholder substituted with the component identifier
pub const COMPONENT_VARIABLE: &str = "%COMP%";
/// Host attribute template
pub const HOST_ATTR: &str = "_nghost-%COMP%";
/// Content attribute template
pub const CONTENT_ATTR: &str = "_ngcontent-%COMP%";

static SOURCE_MAP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\*#\s*sourceMappingURL=(.+?)\s*\*/").expect("source map pattern is valid")
});

/// `_ngcontent-<id>`
pub fn shim_content_attribute(component_short_id: &str) -> String {
    CONTENT_ATTR.replace(COMPONENT_VARIABLE, component_short_id)
}

/// `_nghost-<id>`
pub fn shim_host_attribute(component_short_id: &str) -> String {
    HOST_ATTR.replace(COMPONENT_VARIABLE, component_short_id)
}

/// Replace every placeholder in every style sheet
pub fn shim_styles_content(component_id: &str, styles: &[String]) -> Vec<String> {
    styles.iter().map(|s| s.replace(COMPONENT_VARIABLE, component_id)).collect()
}

/// Rewrite relative `sourceMappingURL` comments to resolve against the
/// document base href. Only the first comment of each sheet is touched; an
/// empty base href counts as none.
pub fn add_base_href_to_css_source_map(
    base_href: Option<&str>,
    styles: Vec<String>,
) -> Vec<String> {
    let Some(base_href) = base_href.filter(|href| !href.is_empty()) else {
        return styles;
    };
    let Some(base) = Url::parse("http://localhost")
        .and_then(|root| root.join(base_href))
        .ok()
    else {
        return styles;
    };

    styles
        .into_iter()
        .map(|css| {
            if !css.contains("sourceMappingURL=") {
                return css;
            }
            SOURCE_MAP_URL
                .replace(&css, |caps: &Captures<'_>| {
                    let source_map = &caps[1];
                    if is_absolute_source_map(source_map) {
                        return format!("/*# sourceMappingURL={source_map} */");
                    }
                    match base.join(source_map) {
                        Ok(resolved) => format!("/*# sourceMappingURL={} */", resolved.path()),
                        Err(_) => caps[0].to_string(),
                    }
                })
                .into_owned()
        })
        .collect()
}

fn is_absolute_source_map(url: &str) -> bool {
    url.starts_with('/')
        || url.starts_with("data:")
        || url.starts_with("http:")
        || url.starts_with("https:")
}
