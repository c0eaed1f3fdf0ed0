//! Tweet embed rewriter (async, two-phase).
//!
//! Obsidian renders `![](https://x.com/user/status/123)` as a plain image.
//! This pass swaps those images for rich embeds fetched from the oembed
//! collaborator, degrading per item to a deterministic link-blockquote when a
//! lookup fails.
//!
//! Phase 1 matches synchronously and records (index path, url, author handle)
//! without touching the tree. Phase 2 launches one lookup task per match,
//! awaits them all (unordered completion, unbounded concurrency), then applies
//! every replacement in one synchronous sweep in original document order —
//! the tree is never mutated from inside a lookup task, and network timing
//! cannot reorder the output.

use std::sync::{Arc, LazyLock};

use log::debug;
use regex::Regex;
use tokio::task::JoinSet;

use crate::dom::parse::FragmentParser;
use crate::dom::visit::{collect, replace_at};
use crate::dom::{Document, Element, Node};
use crate::oembed::{TweetLookup, TweetRendering};

static TWEET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(twitter\.com|x\.com|mobile\.twitter\.com)/([^/]+)/status/(\d+)$")
        .unwrap()
});

const EMBED_CLASSES: &[&str] = &["external-embed", "twitter"];

/// One matched tweet image, recorded before any mutation.
struct TweetMatch {
    path: Vec<usize>,
    url: String,
    user: String,
}

/// Replaces tweet images with oembed markup or a fallback blockquote.
pub struct TweetEmbed {
    lookup: Arc<dyn TweetLookup>,
    parser: Arc<dyn FragmentParser>,
}

impl TweetEmbed {
    pub fn new(lookup: Arc<dyn TweetLookup>, parser: Arc<dyn FragmentParser>) -> Self {
        Self { lookup, parser }
    }

    /// Run both phases. Completes only once every replacement (or fallback)
    /// has been applied.
    pub async fn run(&self, doc: &mut Document) {
        let matches = Self::matches(doc);
        if matches.is_empty() {
            return;
        }

        let results = self.lookups(&matches).await;

        for (matched, rendering) in matches.into_iter().zip(results) {
            let node = self.embed_node(&matched, rendering);
            if !replace_at(&mut doc.root, &matched.path, node) {
                debug!("tweet embed target vanished at {:?}", matched.path);
            }
        }
    }

    /// Phase 1: match tweet images without mutating the tree.
    fn matches(doc: &Document) -> Vec<TweetMatch> {
        let mut found = Vec::new();
        collect(&doc.root, &mut |elem, path| {
            if !elem.is_tag("img") {
                return;
            }
            let Some(src) = elem.get_attr_str("src") else {
                return;
            };
            let Some(caps) = TWEET_URL.captures(src) else {
                return;
            };
            found.push(TweetMatch {
                path: path.to_vec(),
                url: src.to_string(),
                user: caps[2].to_string(),
            });
        });
        found
    }

    /// Phase 2: one concurrent lookup per match, results slotted back into a
    /// fixed-order vector by original index. A failed or panicked task leaves
    /// `None` in its slot; other lookups are unaffected.
    async fn lookups(&self, matches: &[TweetMatch]) -> Vec<Option<TweetRendering>> {
        let mut results: Vec<Option<TweetRendering>> = Vec::new();
        results.resize_with(matches.len(), || None);

        let mut tasks = JoinSet::new();
        for (index, matched) in matches.iter().enumerate() {
            let lookup = Arc::clone(&self.lookup);
            let url = matched.url.clone();
            tasks.spawn(async move { (index, lookup.lookup(&url).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, rendering)) => results[index] = rendering,
                Err(err) => debug!("tweet lookup task failed: {err}"),
            }
        }
        results
    }

    /// Build the replacement node: parsed oembed markup when the lookup
    /// succeeded with content, the fallback blockquote otherwise. Both carry
    /// the fixed embed class pair on top of whatever they already have.
    fn embed_node(&self, matched: &TweetMatch, rendering: Option<TweetRendering>) -> Node {
        let mut elem = rendering
            .filter(|r| !r.markup.trim().is_empty())
            .and_then(|r| self.parse_embed(&r.markup))
            .unwrap_or_else(|| Self::fallback(matched));
        for class in EMBED_CLASSES {
            elem.add_class(class);
        }
        Node::elem(elem)
    }

    /// First top-level element of the parsed markup, or the whole fragment
    /// wrapped in a container when it has no top-level element.
    fn parse_embed(&self, markup: &str) -> Option<Element> {
        let fragment = self.parser.parse_fragment(markup);
        if fragment.is_empty() {
            return None;
        }
        match fragment.iter().position(Node::is_element) {
            Some(index) => match fragment.into_iter().nth(index) {
                Some(Node::Element(elem)) => Some(*elem),
                _ => None,
            },
            None => {
                let mut wrapper = Element::new("div");
                wrapper.children = fragment;
                Some(wrapper)
            }
        }
    }

    /// Deterministic rendering used when the lookup fails: a blockquote
    /// linking back to the original post.
    fn fallback(matched: &TweetMatch) -> Element {
        Element::new("blockquote").with_child(Node::elem(
            Element::new("a")
                .with_attr("href", matched.url.as_str())
                .with_text(format!("Tweet by @{}", matched.user)),
        ))
    }
}
