//! Mutation-safe depth-first traversal.
//!
//! [`walk`] visits every element in parent-before-children, left-to-right
//! order while the callback mutates the tree under it. The next index is
//! derived from current state at every step (no cached offsets, no flattened
//! node list), so splicing siblings in or out mid-walk neither skips nor
//! double-visits a node. The callback reports what it did via [`Flow`]:
//!
//! | Flow | Meaning |
//! |------|---------|
//! | `Descend` | Recurse into the visited node's children, then next sibling |
//! | `SkipChildren` | Do not descend (replacement subtrees are never auto-entered) |
//! | `Removed` | The visited node was spliced out; the same index now holds the next sibling |
//! | `ReplacedChildren` | The parent's child list was reassigned wholesale; stop walking it |
//!
//! [`collect`] and [`replace_at`] support the match-first-mutate-later
//! discipline of the async pass: record index paths synchronously, apply
//! replacements after the awaits settle.

use super::{Element, Node};

/// Callback verdict controlling the walk after one element visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Descend,
    SkipChildren,
    Removed,
    ReplacedChildren,
}

/// Depth-first walk over element nodes. The callback receives the parent's
/// child vector and the index of the visited element, giving it full sibling
/// access (backward search, forward peeking, splicing).
///
/// The root element itself is not visited; it is the synthetic fragment
/// container.
pub fn walk<F>(root: &mut Element, visit: &mut F)
where
    F: FnMut(&mut Vec<Node>, usize) -> Flow,
{
    let mut index = 0;
    while index < root.children.len() {
        if !root.children[index].is_element() {
            index += 1;
            continue;
        }
        match visit(&mut root.children, index) {
            Flow::Descend => {
                if let Some(elem) = root.children.get_mut(index).and_then(Node::as_element_mut) {
                    walk(elem, visit);
                }
                index += 1;
            }
            Flow::SkipChildren => index += 1,
            // Splice-out shifted the siblings left; revisit the same index.
            Flow::Removed => {}
            Flow::ReplacedChildren => break,
        }
    }
}

/// Read-only walk yielding each element with its index path from the root.
pub fn collect<F>(root: &Element, visit: &mut F)
where
    F: FnMut(&Element, &[usize]),
{
    let mut path = Vec::new();
    collect_inner(root, &mut path, visit);
}

fn collect_inner<F>(elem: &Element, path: &mut Vec<usize>, visit: &mut F)
where
    F: FnMut(&Element, &[usize]),
{
    for (index, child) in elem.children.iter().enumerate() {
        if let Node::Element(child_elem) = child {
            path.push(index);
            visit(child_elem, path);
            collect_inner(child_elem, path, visit);
            path.pop();
        }
    }
}

/// Replace the node at a recorded index path. Returns `false` (leaving the
/// tree untouched) when the path no longer resolves.
pub fn replace_at(root: &mut Element, path: &[usize], node: Node) -> bool {
    let Some((&last, parents)) = path.split_last() else {
        return false;
    };

    let mut current = root;
    for &index in parents {
        match current.children.get_mut(index).and_then(Node::as_element_mut) {
            Some(next) => current = next,
            None => return false,
        }
    }

    if last < current.children.len() {
        current.children[last] = node;
        true
    } else {
        false
    }
}
