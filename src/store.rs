//! Per-document side-channel metadata.
//!
//! The block-reference pass records which `^token` ids it attached; when the
//! pipeline finishes, the orchestrator snapshots the matching elements (and
//! the whole tree) out of the final document. Consumers therefore observe the
//! elements' post-pipeline state. The store is caller-owned and scoped to one
//! document; there is no shared or module-level state.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::dom::{Document, Element, visit};

/// Block-id metadata accumulated alongside one document's rewrite.
#[derive(Debug, Default, Clone)]
pub struct BlockStore {
    /// Tokens in attach order. Duplicates permitted (last writer wins).
    order: Vec<String>,
    /// Block id -> element carrying that id, snapshotted from the final tree.
    pub blocks: FxHashMap<String, Element>,
    /// Snapshot of the final tree.
    pub tree: Option<Document>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.blocks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Record a resolved block id. Collisions are not detected; the element
    /// that carries the id last in document order wins at finalization.
    pub(crate) fn record(&mut self, token: &str) {
        self.order.push(token.to_string());
    }

    /// Snapshot resolved blocks out of the final tree.
    ///
    /// For every recorded token, the document-order-last element whose `id`
    /// attribute equals the token is kept. A token whose element was removed
    /// by a later pass resolves to nothing.
    pub(crate) fn finalize(&mut self, doc: &Document) {
        if !self.order.is_empty() {
            let wanted: FxHashSet<&str> = self.order.iter().map(String::as_str).collect();
            let mut blocks = FxHashMap::default();
            visit::collect(&doc.root, &mut |elem, _path| {
                if let Some(id) = elem.get_attr_str("id")
                    && wanted.contains(id)
                {
                    blocks.insert(id.to_string(), elem.clone());
                }
            });
            self.blocks = blocks;
        }
        self.tree = Some(doc.clone());
    }
}
