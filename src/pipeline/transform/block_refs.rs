//! Block-reference resolver.
//!
//! Obsidian lets authors mark any block with a trailing `^token`; other notes
//! then embed or link that block by id. This pass converts the visible marker
//! into an `id` attribute and records the mapping in the [`BlockStore`].
//!
//! Two marker shapes:
//!
//! - **Block**: a `blockquote` followed two siblings later by a paragraph
//!   whose first text child ends with the marker. The paragraph (the bare
//!   marker line the author typed) is deleted and the id lands on the
//!   blockquote, so the intervening sibling (e.g. a caption the quote owns)
//!   survives.
//! - **Inline**: a `p`/`li` whose last text child ends with the marker. The
//!   marker is stripped; if nothing remains, the empty text node is dropped
//!   and the id lands on the nearest preceding element sibling (the marker
//!   referred to the block above it), falling back to the element itself.
//!
//! Runs first in the pipeline: later passes may replace or delete the nodes
//! this one annotates. Malformed markers and duplicate ids are non-events.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::visit::{Flow, walk};
use crate::dom::{Document, Element, Node, matcher};
use crate::pipeline::Transform;
use crate::store::BlockStore;

static BLOCK_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^([-_A-Za-z0-9]+)$").unwrap());

/// Tags whose trailing text may carry an inline marker.
const INLINE_TAGS: &[&str] = &["p", "li"];
/// Tags that take their id from a marker paragraph two siblings later.
const BLOCK_TAGS: &[&str] = &["blockquote"];

/// Resolves `^token` markers into `id` attributes plus store entries.
pub struct BlockReferences<'a> {
    store: &'a mut BlockStore,
}

impl<'a> BlockReferences<'a> {
    pub fn new(store: &'a mut BlockStore) -> Self {
        Self { store }
    }

    fn apply_block_id(&mut self, elem: &mut Element, token: &str) {
        elem.set_attr("id", token);
        self.store.record(token);
    }

    /// Block rule: marker paragraph two siblings after a blockquote.
    fn resolve_block_marker(&mut self, children: &mut Vec<Node>, index: usize) {
        let marker_index = index + 2;
        let Some(token) = children
            .get(marker_index)
            .and_then(Node::as_element)
            .and_then(|sibling| {
                if !sibling.is_tag("p") {
                    return None;
                }
                let first = sibling.children.first()?.as_text()?;
                let caps = BLOCK_REF.captures(&first.value)?;
                Some(caps[1].to_string())
            })
        else {
            return;
        };

        children.remove(marker_index);
        if let Some(elem) = children[index].as_element_mut() {
            self.apply_block_id(elem, &token);
        }
    }

    /// Inline rule: marker at the end of the element's own last text child.
    fn resolve_inline_marker(&mut self, children: &mut Vec<Node>, index: usize) {
        let Some((token, stripped)) = children[index].as_element().and_then(|elem| {
            let last = elem.children.last()?.as_text()?;
            let caps = BLOCK_REF.captures(&last.value)?;
            let token = caps[1].to_string();
            let stripped = BLOCK_REF.replace(&last.value, "").trim_end().to_string();
            Some((token, stripped))
        }) else {
            return;
        };

        if stripped.is_empty() {
            // The marker sat on its own line: drop the emptied text node and
            // hang the id on the block above, if there is one.
            if let Some(elem) = children[index].as_element_mut() {
                elem.children.pop();
            }
            if let Some(prev) = matcher::preceding_element_index(children, index) {
                if let Some(elem) = children[prev].as_element_mut() {
                    self.apply_block_id(elem, &token);
                }
                return;
            }
        } else if let Some(elem) = children[index].as_element_mut()
            && let Some(last) = elem.children.last_mut().and_then(Node::as_text_mut)
        {
            last.value = stripped;
        }

        if let Some(elem) = children[index].as_element_mut() {
            self.apply_block_id(elem, &token);
        }
    }
}

impl Transform for BlockReferences<'_> {
    fn transform(mut self, mut doc: Document) -> Document {
        walk(&mut doc.root, &mut |children, index| {
            let Some(tag) = children[index].as_element().map(|e| e.tag.clone()) else {
                return Flow::Descend;
            };

            if BLOCK_TAGS.contains(&tag.as_str()) {
                self.resolve_block_marker(children, index);
            } else if INLINE_TAGS.contains(&tag.as_str()) {
                self.resolve_inline_marker(children, index);
            }
            Flow::Descend
        });
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::matcher::find_by_tag;

    fn resolve(markup: &str) -> (Document, BlockStore) {
        let mut store = BlockStore::new();
        let doc = BlockReferences::new(&mut store).transform(Document::parse(markup));
        store.finalize(&doc);
        (doc, store)
    }

    #[test]
    fn test_inline_marker_with_remaining_text() {
        let (doc, store) = resolve("<p>Some text ^blockId</p>");
        let para = find_by_tag(&doc.root, "p").unwrap();
        assert_eq!(para.get_attr_str("id"), Some("blockId"));
        assert_eq!(para.children[0].as_text().unwrap().value, "Some text");
        assert!(store.contains("blockId"));
    }

    #[test]
    fn test_marker_on_own_line_attaches_to_preceding_element() {
        let (doc, store) = resolve("<ul><li>item</li></ul><p>^above</p>");
        let list = find_by_tag(&doc.root, "ul").unwrap();
        assert_eq!(list.get_attr_str("id"), Some("above"));
        // The marker paragraph stays, minus its emptied text node.
        let para = find_by_tag(&doc.root, "p").unwrap();
        assert!(para.children.is_empty());
        assert!(para.get_attr_str("id").is_none());
        assert_eq!(store.get("above").unwrap().tag, "ul");
    }

    #[test]
    fn test_marker_on_own_line_without_preceding_falls_back_to_self() {
        let (doc, store) = resolve("<p>^lonely</p>");
        let para = find_by_tag(&doc.root, "p").unwrap();
        assert_eq!(para.get_attr_str("id"), Some("lonely"));
        assert!(para.children.is_empty());
        assert!(store.contains("lonely"));
    }

    #[test]
    fn test_blockquote_marker_two_siblings_later() {
        let (doc, store) = resolve(
            "<blockquote><p>quoted</p></blockquote><figcaption>src</figcaption><p>^quote1</p>",
        );
        let quote = find_by_tag(&doc.root, "blockquote").unwrap();
        assert_eq!(quote.get_attr_str("id"), Some("quote1"));
        // The bare marker paragraph is gone; the caption survives.
        assert!(find_by_tag(&doc.root, "figcaption").is_some());
        assert_eq!(doc.root.children.len(), 2);
        assert_eq!(store.get("quote1").unwrap().tag, "blockquote");
    }

    #[test]
    fn test_list_item_marker() {
        let (doc, _) = resolve("<ul><li>task one ^t1</li><li>task two</li></ul>");
        let li = find_by_tag(&doc.root, "li").unwrap();
        assert_eq!(li.get_attr_str("id"), Some("t1"));
        assert_eq!(li.children[0].as_text().unwrap().value, "task one");
    }

    #[test]
    fn test_marker_strips_trailing_whitespace() {
        let (doc, _) = resolve("<p>Padded   ^pad</p>");
        let para = find_by_tag(&doc.root, "p").unwrap();
        assert_eq!(para.children[0].as_text().unwrap().value, "Padded");
    }

    #[test]
    fn test_non_markers_are_untouched() {
        let (doc, store) = resolve("<p>caret ^ but no token</p><p>mid ^tok en</p>");
        for para in crate::dom::matcher::find_all_by_tag(&doc.root, "p") {
            assert!(para.get_attr_str("id").is_none());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_markers_last_writer_wins() {
        let (_, store) = resolve("<p>first ^dup</p><p>second ^dup</p>");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("dup").unwrap().children[0].as_text().unwrap().value,
            "second"
        );
    }

    #[test]
    fn test_id_overwrites_existing_attribute() {
        let (doc, _) = resolve("<p id=\"old\">text ^new</p>");
        let para = find_by_tag(&doc.root, "p").unwrap();
        assert_eq!(para.get_attr_str("id"), Some("new"));
    }

    #[test]
    fn test_store_snapshots_final_tree() {
        let (doc, store) = resolve("<p>Some text ^x</p>");
        assert_eq!(store.tree.as_ref().unwrap(), &doc);
    }
}
