//! HTML fragment parsing seam.
//!
//! The pipeline treats markup parsing as a black box: anything that turns a
//! markup string into node-model fragments can back the tweet rewriter. The
//! default implementation is built on `tl`.

use super::{Element, Node, Text, Value};

/// Markup-to-fragment parser collaborator.
pub trait FragmentParser: Send + Sync {
    /// Parse a markup string into its top-level nodes (zero, one, or many).
    /// Unparseable input yields an empty fragment, never an error.
    fn parse_fragment(&self, markup: &str) -> Vec<Node>;
}

/// `tl`-backed [`FragmentParser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TlFragmentParser;

impl FragmentParser for TlFragmentParser {
    fn parse_fragment(&self, markup: &str) -> Vec<Node> {
        let Ok(dom) = tl::parse(markup, tl::ParserOptions::default()) else {
            return Vec::new();
        };
        let parser = dom.parser();
        dom.children()
            .iter()
            .filter_map(|handle| convert(handle, parser))
            .collect()
    }
}

fn convert(handle: &tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let mut elem = Element::new(tag.name().as_utf8_str().into_owned());
            for (name, value) in tag.attributes().iter() {
                let name = name.into_owned();
                let value = match value {
                    // Valueless attributes are presence booleans (checked, disabled).
                    None => Value::Bool(true),
                    Some(v) if name == "class" => {
                        Value::List(v.split_whitespace().map(str::to_string).collect())
                    }
                    Some(v) => Value::Str(v.into_owned()),
                };
                elem.set_attr(name, value);
            }
            for child in tag.children().top().iter() {
                if let Some(node) = convert(child, parser) {
                    elem.push(node);
                }
            }
            Some(Node::Element(Box::new(elem)))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(Text::new(bytes.as_utf8_str().into_owned()))),
        tl::Node::Comment(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_fragment() {
        let nodes = TlFragmentParser.parse_fragment("<blockquote><p>hi</p></blockquote>");
        assert_eq!(nodes.len(), 1);
        let quote = nodes[0].as_element().unwrap();
        assert_eq!(quote.tag, "blockquote");
        let para = quote.children[0].as_element().unwrap();
        assert_eq!(para.children[0].as_text().unwrap().value, "hi");
    }

    #[test]
    fn test_valueless_attribute_is_boolean() {
        let nodes = TlFragmentParser.parse_fragment("<input type=\"checkbox\" checked disabled>");
        let input = nodes[0].as_element().unwrap();
        assert_eq!(input.get_attr("checked"), Some(&Value::Bool(true)));
        assert_eq!(input.get_attr("disabled"), Some(&Value::Bool(true)));
        assert_eq!(input.get_attr_str("type"), Some("checkbox"));
    }

    #[test]
    fn test_class_attribute_becomes_list() {
        let nodes = TlFragmentParser.parse_fragment("<li class=\"task-list-item done\">x</li>");
        let li = nodes[0].as_element().unwrap();
        assert_eq!(li.class_list(), vec!["task-list-item", "done"]);
    }

    #[test]
    fn test_multiple_top_level_nodes() {
        let nodes = TlFragmentParser.parse_fragment("<p>a</p>text<p>b</p>");
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_element());
        assert!(nodes[1].is_text());
        assert!(nodes[2].is_element());
    }

    #[test]
    fn test_text_only_fragment_has_no_elements() {
        let nodes = TlFragmentParser.parse_fragment("plain words");
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_text());
    }

    #[test]
    fn test_empty_input_yields_empty_fragment() {
        assert!(TlFragmentParser.parse_fragment("").is_empty());
    }
}
