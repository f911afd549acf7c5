//! Element Attributes
//!
//! Attribute storage with namespace-aware lookup. Insertion order is kept so
//! serialized markup is stable.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Qualified name as written (`xlink:href`, `class`)
    pub name: String,
    /// Namespace URI, when set through a namespaced call
    pub namespace: Option<String>,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            value: value.into(),
        }
    }

    /// Local part of the qualified name
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }
}

/// Attribute collection of one element
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }

    /// Get attribute value by qualified name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get attribute value by namespace and local name
    pub fn get_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name() == local_name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute, replacing an existing one with the same name
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attributes.push(Attr::new(name, value));
        }
    }

    /// Set a namespaced attribute; matching is by namespace and local name
    pub fn set_ns(&mut self, namespace: &str, qualified_name: &str, value: &str) {
        let local = qualified_name
            .split_once(':')
            .map_or(qualified_name, |(_, local)| local);
        if let Some(attr) = self
            .attributes
            .iter_mut()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name() == local)
        {
            attr.name = qualified_name.to_string();
            attr.value = value.to_string();
        } else {
            self.attributes.push(Attr {
                name: qualified_name.to_string(),
                namespace: Some(namespace.to_string()),
                value: value.to_string(),
            });
        }
    }

    /// Remove attribute by qualified name
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos))
    }

    /// Remove attribute by namespace and local name
    pub fn remove_ns(&mut self, namespace: &str, local_name: &str) -> Option<Attr> {
        let pos = self.attributes.iter().position(|a| {
            a.namespace.as_deref() == Some(namespace) && a.local_name() == local_name
        })?;
        Some(self.attributes.remove(pos))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut map = NamedNodeMap::new();
        map.set("id", "a");
        map.set("class", "x");
        map.set("id", "b");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("id"), Some("b"));
        assert_eq!(map.iter().next().map(|a| a.name.as_str()), Some("id"));
    }

    #[test]
    fn test_namespaced_attributes() {
        let mut map = NamedNodeMap::new();
        map.set_ns("http://www.w3.org/1999/xlink", "xlink:href", "#icon");

        assert_eq!(map.get_ns("http://www.w3.org/1999/xlink", "href"), Some("#icon"));
        assert_eq!(map.get("xlink:href"), Some("#icon"));
        assert!(map.remove_ns("http://www.w3.org/1999/xlink", "href").is_some());
        assert!(map.is_empty());
    }
}
