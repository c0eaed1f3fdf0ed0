//! Element and text nodes of the document tree.

use super::value::Value;

// =============================================================================
// Text
// =============================================================================

/// Text node. Owned exclusively by its parent element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub value: String,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

// =============================================================================
// Element
// =============================================================================

/// Element node: tag name, ordered attribute bag, ordered children.
///
/// Attribute order is preserved; lookups are linear scans (bags are small).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, Value)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// Append a text child.
    pub fn with_text(self, value: impl Into<String>) -> Self {
        self.with_child(Node::text(value))
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    // -------------------------------------------------------------------------
    // Attribute access
    // -------------------------------------------------------------------------

    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// String-typed attribute value; `None` for absent or non-string values.
    pub fn get_attr_str(&self, name: &str) -> Option<&str> {
        self.get_attr(name).and_then(Value::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Set an attribute, overwriting any prior value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute, returning its value if present.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        let index = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(index).1)
    }

    // -------------------------------------------------------------------------
    // Class list
    // -------------------------------------------------------------------------

    /// The class list, normalized from whichever representation the attribute
    /// bag currently holds (single string, list, or absent).
    ///
    /// This is the one shared accessor every pass routes class membership
    /// through; do not re-normalize ad hoc at call sites.
    pub fn class_list(&self) -> Vec<String> {
        match self.get_attr("class") {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Str(s)) => s.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().iter().any(|c| c == class)
    }

    /// Append a class if not already present (order-preserving; existing
    /// duplicates are left alone). Normalizes storage to the list form.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes = self.class_list();
        classes.push(class.to_string());
        self.set_attr("class", Value::List(classes));
    }
}

// =============================================================================
// Node
// =============================================================================

/// Tree node sum type.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    pub fn elem(element: Element) -> Self {
        Node::Element(Box::new(element))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text::new(value))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_overwrites() {
        let mut elem = Element::new("a").with_attr("href", "/old");
        elem.set_attr("href", "/new");
        assert_eq!(elem.get_attr_str("href"), Some("/new"));
        assert_eq!(elem.attrs.len(), 1);
    }

    #[test]
    fn test_remove_attr_returns_value() {
        let mut elem = Element::new("li").with_attr("data-task-char", "-");
        assert_eq!(
            elem.remove_attr("data-task-char"),
            Some(Value::from("-"))
        );
        assert!(!elem.has_attr("data-task-char"));
        assert_eq!(elem.remove_attr("data-task-char"), None);
    }

    #[test]
    fn test_class_list_normalizes_string_form() {
        let elem = Element::new("code").with_attr("class", "language-rust mermaid");
        assert_eq!(elem.class_list(), vec!["language-rust", "mermaid"]);
        assert!(elem.has_class("mermaid"));
        assert!(!elem.has_class("language"));
    }

    #[test]
    fn test_class_list_absent_is_empty() {
        let elem = Element::new("p");
        assert!(elem.class_list().is_empty());
        assert!(!elem.has_class("anything"));
    }

    #[test]
    fn test_add_class_appends_once() {
        let mut elem = Element::new("a").with_attr("class", "existing");
        elem.add_class("obsidian-uri");
        elem.add_class("obsidian-uri");
        assert_eq!(
            elem.get_attr("class"),
            Some(&Value::List(vec![
                "existing".to_string(),
                "obsidian-uri".to_string()
            ]))
        );
    }
}
