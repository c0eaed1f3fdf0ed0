//! Document tree model.
//!
//! The node model is a plain owned tree: a [`Document`] holds a synthetic
//! fragment root [`Element`], elements own their attribute bag and children,
//! and [`Node`] is the Element/Text sum type. Every transform mutates this
//! tree in place through the traversal engine in [`visit`].
//!
//! # Modules
//!
//! - [`matcher`]: shared structural predicates
//! - [`parse`]: markup-to-fragment parsing seam (`tl`-backed by default)
//! - [`visit`]: mutation-safe depth-first traversal

pub mod matcher;
mod node;
pub mod parse;
mod value;
pub mod visit;

pub use node::{Element, Node, Text};
pub use value::Value;

/// Tag of the synthetic fragment root. Passes never match the root itself.
pub const FRAGMENT_TAG: &str = "#fragment";

/// A parsed document fragment owning its whole node tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Wrap top-level nodes in a synthetic fragment root.
    pub fn fragment(children: Vec<Node>) -> Self {
        let mut root = Element::new(FRAGMENT_TAG);
        root.children = children;
        Self { root }
    }

    /// Parse an HTML fragment with the default parser.
    pub fn parse(markup: &str) -> Self {
        use parse::FragmentParser;
        Self::fragment(parse::TlFragmentParser.parse_fragment(markup))
    }

    /// Top-level nodes of the fragment.
    pub fn children(&self) -> &[Node] {
        &self.root.children
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::fragment(Vec::new())
    }
}
