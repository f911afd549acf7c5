//! Element Query and Methods
//!
//! Attribute, class, inline style and property access, plus
//! querySelector over compound selectors with descendant combinators.

use crate::{
    DomError, DomResult, Document, ElementData, NodeData, NodeId, PropertyValue, StyleDeclaration,
};

impl Document {
    fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.get(node)?.as_element()
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        self.tree.get_mut(node)?.as_element_mut()
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name)
    }

    pub fn get_attribute_ns(
        &self,
        node: NodeId,
        namespace: &str,
        local_name: &str,
    ) -> Option<&str> {
        self.element(node)?.attrs.get_ns(namespace, local_name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Set an attribute; a no-op on non-element nodes
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.set(name, value);
        }
    }

    pub fn set_attribute_ns(
        &mut self,
        node: NodeId,
        namespace: &str,
        qualified_name: &str,
        value: &str,
    ) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.set_ns(namespace, qualified_name, value);
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.remove(name);
        }
    }

    pub fn remove_attribute_ns(&mut self, node: NodeId, namespace: &str, local_name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.remove_ns(namespace, local_name);
        }
    }

    /// All attributes as (qualified name, value) pairs, in insertion order
    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node)
            .map(|el| el.attrs.iter().map(|a| (a.name.clone(), a.value.clone())).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.classes().any(|c| c == class))
    }

    /// `classList.add`
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(el) = self.element_mut(node) else { return };
        if el.classes().any(|c| c == class) {
            return;
        }
        let mut classes: Vec<&str> = el.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        el.attrs.set("class", &joined);
    }

    /// `classList.remove`
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(el) = self.element_mut(node) else { return };
        if !el.classes().any(|c| c == class) {
            return;
        }
        let joined = el.classes().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
        el.attrs.set("class", &joined);
    }

    /// `style.setProperty` with a dash-case property name
    pub fn set_style_property(
        &mut self,
        node: NodeId,
        property: &str,
        value: &str,
        important: bool,
    ) {
        let Some(el) = self.element_mut(node) else { return };
        if value.is_empty() {
            el.styles.retain(|s| s.property != property);
            return;
        }
        match el.styles.iter_mut().find(|s| s.property == property) {
            Some(decl) => {
                decl.value = value.to_string();
                decl.important = important;
            }
            None => el.styles.push(StyleDeclaration {
                property: property.to_string(),
                value: value.to_string(),
                important,
            }),
        }
    }

    /// `style.removeProperty`
    pub fn remove_style_property(&mut self, node: NodeId, property: &str) {
        if let Some(el) = self.element_mut(node) {
            el.styles.retain(|s| s.property != property);
        }
    }

    pub fn style_property(&self, node: NodeId, property: &str) -> Option<&StyleDeclaration> {
        self.element(node)?.style(property)
    }

    pub fn set_property(&mut self, node: NodeId, name: &str, value: PropertyValue) {
        if let Some(el) = self.element_mut(node) {
            el.properties.insert(name.to_string(), value);
        }
    }

    pub fn property(&self, node: NodeId, name: &str) -> Option<&PropertyValue> {
        self.element(node)?.properties.get(name)
    }

    /// First element in document order matching `selector`
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(self.query_selector_all_from(self.root(), selector)?.into_iter().next())
    }

    /// All descendants of `root` matching `selector`, in document order.
    /// Shadow trees and template content are not searched.
    pub fn query_selector_all_from(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)
            .ok_or_else(|| DomError::InvalidSelector(selector.to_string()))?;
        let mut found = Vec::new();
        self.collect_matches(root, &list, &mut found);
        Ok(found)
    }

    fn collect_matches(&self, parent: NodeId, list: &SelectorList, found: &mut Vec<NodeId>) {
        for (child, node) in self.tree.children(parent) {
            if node.is_element() && list.matches(self, child) {
                found.push(child);
            }
            self.collect_matches(child, list, found);
        }
    }

    /// Whether `node` matches `selector`
    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        let list = SelectorList::parse(selector)
            .ok_or_else(|| DomError::InvalidSelector(selector.to_string()))?;
        Ok(list.matches(self, node))
    }
}

/// Simple selector component
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    /// `[name]` or `[name="value"]`
    Attribute { name: String, value: Option<String> },
    Universal,
}

impl SimpleSelector {
    fn matches(&self, el: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => el.name.eq_ignore_ascii_case(tag),
            Self::Id(id) => el.attrs.get("id") == Some(id.as_str()),
            Self::Class(class) => el.classes().any(|c| c == class),
            Self::Attribute { name, value } => match (el.attrs.get(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
        }
    }
}

/// Compound selectors joined by descendant combinators, rightmost last
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector(Vec<Vec<SimpleSelector>>);

/// Comma-separated selector groups
#[derive(Debug, Clone, PartialEq)]
struct SelectorList(Vec<ComplexSelector>);

impl SelectorList {
    fn parse(input: &str) -> Option<Self> {
        let groups = split_outside_brackets(input, |c| c == ',');
        let mut list = Vec::with_capacity(groups.len());
        for group in groups {
            let parts = split_outside_brackets(group, char::is_whitespace);
            let compounds: Option<Vec<_>> = parts
                .into_iter()
                .filter(|p| !p.is_empty())
                .map(parse_compound)
                .collect();
            let compounds = compounds?;
            if compounds.is_empty() {
                return None;
            }
            list.push(ComplexSelector(compounds));
        }
        Some(Self(list))
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.0.iter().any(|complex| complex.matches(doc, node))
    }
}

impl ComplexSelector {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some((last, ancestors)) = self.0.split_last() else { return false };
        if !compound_matches(doc, node, last) {
            return false;
        }
        let mut current = doc.tree.parent(node);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(id) = current else { return false };
                current = doc.tree.parent(id);
                if compound_matches(doc, id, compound) {
                    break;
                }
            }
        }
        true
    }
}

fn compound_matches(doc: &Document, node: NodeId, compound: &[SimpleSelector]) -> bool {
    match doc.tree.get(node).map(|n| &n.data) {
        Some(NodeData::Element(el)) => compound.iter().all(|s| s.matches(el)),
        _ => false,
    }
}

fn split_outside_brackets(input: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_separator(c) => {
                parts.push(input[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

fn parse_compound(input: &str) -> Option<Vec<SimpleSelector>> {
    let mut selectors = Vec::new();
    let mut rest = input;

    let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
    match &rest[..tag_end] {
        "" => {}
        "*" => selectors.push(SimpleSelector::Universal),
        tag if tag.chars().all(is_ident_char) => {
            selectors.push(SimpleSelector::Tag(tag.to_ascii_lowercase()))
        }
        _ => return None,
    }
    rest = &rest[tag_end..];

    while let Some(first) = rest.chars().next() {
        match first {
            '.' | '#' => {
                let body = &rest[1..];
                let end = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
                if end == 0 {
                    return None;
                }
                let name = body[..end].to_string();
                selectors.push(if first == '.' {
                    SimpleSelector::Class(name)
                } else {
                    SimpleSelector::Id(name)
                });
                rest = &body[end..];
            }
            '[' => {
                let end = rest.find(']')?;
                let inner = rest[1..end].trim();
                let (name, value) = match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                        (name.trim(), Some(value.to_string()))
                    }
                    None => (inner, None),
                };
                if name.is_empty() || !name.chars().all(is_ident_char) {
                    return None;
                }
                selectors.push(SimpleSelector::Attribute {
                    name: name.to_string(),
                    value,
                });
                rest = &rest[end + 1..];
            }
            _ => return None,
        }
    }

    (!selectors.is_empty()).then_some(selectors)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        assert_eq!(
            parse_compound("style[ng-app-id=\"app\"]"),
            Some(vec![
                SimpleSelector::Tag("style".into()),
                SimpleSelector::Attribute {
                    name: "ng-app-id".into(),
                    value: Some("app".into()),
                },
            ])
        );
        assert_eq!(
            parse_compound("div#main.wide"),
            Some(vec![
                SimpleSelector::Tag("div".into()),
                SimpleSelector::Id("main".into()),
                SimpleSelector::Class("wide".into()),
            ])
        );
        assert_eq!(parse_compound("div>"), None);
    }

    #[test]
    fn test_class_list() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        doc.add_class(div, "a");
        doc.add_class(div, "b");
        doc.add_class(div, "a");
        assert_eq!(doc.get_attribute(div, "class"), Some("a b"));

        doc.remove_class(div, "a");
        assert!(!doc.has_class(div, "a"));
        assert!(doc.has_class(div, "b"));
    }

    #[test]
    fn test_style_properties() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        doc.set_style_property(div, "background-color", "red", false);
        doc.set_style_property(div, "background-color", "blue", true);

        let decl = doc.style_property(div, "background-color").unwrap();
        assert_eq!(decl.value, "blue");
        assert!(decl.important);

        doc.remove_style_property(div, "background-color");
        assert!(doc.style_property(div, "background-color").is_none());
    }

    #[test]
    fn test_query_selector_groups_and_descendants() {
        let mut doc = Document::default();
        let style = doc.create_element("style");
        let link = doc.create_element("link");
        doc.set_attribute(link, "ng-app-id", "app");
        doc.append_child(doc.head(), style).unwrap();
        doc.append_child(doc.head(), link).unwrap();

        let found = doc
            .query_selector_all_from(doc.root(), "style[ng-app-id=\"app\"],link[ng-app-id=\"app\"]")
            .unwrap();
        assert_eq!(found, vec![link]);

        assert_eq!(doc.query_selector("head link").unwrap(), Some(link));
        assert_eq!(doc.query_selector("body link").unwrap(), None);
        assert!(doc.query_selector("[").is_err());
    }
}
