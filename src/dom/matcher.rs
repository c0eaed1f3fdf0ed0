//! Shared structural predicates.
//!
//! Pure node-shape tests used by every pass. Single-node accessors live on
//! [`Node`] and [`Element`]; this module holds the cross-node shapes
//! (children, siblings, subtree search).

use super::{Element, Node};

/// Whether the node owns at least one child.
pub fn has_children(node: &Node) -> bool {
    node.as_element().is_some_and(|e| !e.children.is_empty())
}

/// First element among the node's direct children.
pub fn first_element_child(elem: &Element) -> Option<&Element> {
    elem.children.iter().find_map(Node::as_element)
}

/// Index of the nearest element sibling strictly before `index`.
pub fn preceding_element_index(children: &[Node], index: usize) -> Option<usize> {
    children[..index]
        .iter()
        .rposition(Node::is_element)
}

/// First direct child element satisfying the predicate.
pub fn find_direct_child(elem: &Element, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
    elem.children
        .iter()
        .filter_map(Node::as_element)
        .find(|child| pred(child))
}

/// Depth-first search for the first element with the given tag.
pub fn find_by_tag<'a>(root: &'a Element, tag: &str) -> Option<&'a Element> {
    for child in &root.children {
        if let Node::Element(elem) = child {
            if elem.is_tag(tag) {
                return Some(elem);
            }
            if let Some(found) = find_by_tag(elem, tag) {
                return Some(found);
            }
        }
    }
    None
}

/// Depth-first collection of every element with the given tag.
pub fn find_all_by_tag<'a>(root: &'a Element, tag: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_by_tag(root, tag, &mut found);
    found
}

fn collect_by_tag<'a>(root: &'a Element, tag: &str, found: &mut Vec<&'a Element>) {
    for child in &root.children {
        if let Node::Element(elem) = child {
            if elem.is_tag(tag) {
                found.push(elem);
            }
            collect_by_tag(elem, tag, found);
        }
    }
}
