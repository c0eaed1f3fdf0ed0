//! Tree rewrite pipeline.
//!
//! Transforms a parsed document through the Obsidian cleanup passes. This
//! module knows nothing about markdown rendering or page templating; it takes
//! a tree in and hands a tree (plus block metadata) back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        Sync Phase 1 (Pipeline)           │
//! │  block references -> youtube embeds      │
//! └──────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────┐
//! │        Async Phase (suspension point)    │
//! │  tweet embeds (concurrent oembed fetch)  │
//! └──────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────┐
//! │        Sync Phase 2 (Pipeline)           │
//! │  checkboxes -> mermaid -> obsidian links │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Pass order is fixed; [`RewriteOptions`] only switches passes off. Block
//! metadata is snapshotted from the final tree after phase 2, so the store
//! reflects every rewrite.

pub mod transform;

use std::sync::Arc;

use serde::Deserialize;

use crate::dom::Document;
use crate::dom::parse::{FragmentParser, TlFragmentParser};
use crate::oembed::{OembedClient, TweetLookup};
use crate::store::BlockStore;

pub use transform::{
    BlockReferences, Checkbox, Mermaid, ObsidianUri, TweetEmbed, YouTubeEmbed,
};

// =============================================================================
// Pipeline
// =============================================================================

/// One synchronous rewrite pass. Takes the document by value; a pass that
/// changes nothing hands it back untouched.
pub trait Transform {
    fn transform(self, doc: Document) -> Document;
}

/// Chains transforms over an owned document.
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            doc: transform.transform(self.doc),
        }
    }

    /// Apply the transform only when `enabled` holds.
    pub fn pipe_if<T: Transform>(self, enabled: bool, transform: T) -> Self {
        if enabled { self.pipe(transform) } else { self }
    }

    pub fn into_inner(self) -> Document {
        self.doc
    }
}

// =============================================================================
// Options
// =============================================================================

/// Per-pass switches. Every pass defaults to on; deserializing partial
/// configuration leaves unnamed passes on and ignores unknown keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
    pub block_references: bool,
    pub youtube_embeds: bool,
    pub tweet_embeds: bool,
    pub checkboxes: bool,
    pub mermaid: bool,
    pub obsidian_links: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            block_references: true,
            youtube_embeds: true,
            tweet_embeds: true,
            checkboxes: true,
            mermaid: true,
            obsidian_links: true,
        }
    }
}

impl RewriteOptions {
    /// Every pass off. Useful as a base when enabling passes one by one.
    pub fn none() -> Self {
        Self {
            block_references: false,
            youtube_embeds: false,
            tweet_embeds: false,
            checkboxes: false,
            mermaid: false,
            obsidian_links: false,
        }
    }
}

// =============================================================================
// Rewriter
// =============================================================================

/// Result of one document rewrite.
#[derive(Debug)]
pub struct RewriteOutput {
    /// The rewritten tree.
    pub doc: Document,
    /// Block-reference metadata, snapshotted from the final tree. Empty when
    /// the block-reference pass is off or found no markers.
    pub store: BlockStore,
}

/// Runs the full pass sequence over documents.
///
/// Reusable across documents; the per-document [`BlockStore`] is created
/// fresh on every [`rewrite`](Self::rewrite) call.
pub struct Rewriter {
    options: RewriteOptions,
    lookup: Arc<dyn TweetLookup>,
    parser: Arc<dyn FragmentParser>,
}

impl Rewriter {
    pub fn new(options: RewriteOptions) -> Self {
        Self {
            options,
            lookup: Arc::new(OembedClient::new()),
            parser: Arc::new(TlFragmentParser),
        }
    }

    /// Swap the tweet lookup (tests, alternative providers).
    pub fn with_lookup(mut self, lookup: Arc<dyn TweetLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    /// Swap the embed-markup parser.
    pub fn with_parser(mut self, parser: Arc<dyn FragmentParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Rewrite one document. Suspends only for tweet lookups; with tweet
    /// embeds off (or no tweets present) this completes without touching the
    /// network.
    pub async fn rewrite(&self, doc: Document) -> RewriteOutput {
        let opts = &self.options;
        let mut store = BlockStore::new();

        let mut doc = Pipeline::new(doc)
            .pipe_if(opts.block_references, BlockReferences::new(&mut store))
            .pipe_if(opts.youtube_embeds, YouTubeEmbed)
            .into_inner();

        if opts.tweet_embeds {
            TweetEmbed::new(Arc::clone(&self.lookup), Arc::clone(&self.parser))
                .run(&mut doc)
                .await;
        }

        let doc = Pipeline::new(doc)
            .pipe_if(opts.checkboxes, Checkbox)
            .pipe_if(opts.mermaid, Mermaid)
            .pipe_if(opts.obsidian_links, ObsidianUri)
            .into_inner();

        if opts.block_references {
            store.finalize(&doc);
        }

        RewriteOutput { doc, store }
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(RewriteOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::dom::matcher::{find_all_by_tag, find_by_tag};
    use crate::oembed::TweetRendering;

    struct NoTweets;

    #[async_trait]
    impl TweetLookup for NoTweets {
        async fn lookup(&self, _url: &str) -> Option<TweetRendering> {
            None
        }
    }

    fn rewriter(options: RewriteOptions) -> Rewriter {
        Rewriter::new(options).with_lookup(Arc::new(NoTweets))
    }

    #[test]
    fn test_options_default_to_all_on() {
        let opts = RewriteOptions::default();
        assert!(opts.block_references && opts.youtube_embeds && opts.tweet_embeds);
        assert!(opts.checkboxes && opts.mermaid && opts.obsidian_links);
    }

    #[test]
    fn test_partial_config_keeps_unnamed_passes_on() {
        let opts: RewriteOptions =
            serde_json::from_str(r#"{"mermaid": false, "tweet_embeds": false}"#).unwrap();
        assert!(!opts.mermaid);
        assert!(!opts.tweet_embeds);
        assert!(opts.block_references);
        assert!(opts.checkboxes);
    }

    #[test]
    fn test_unknown_config_keys_are_ignored() {
        let opts: RewriteOptions =
            serde_json::from_str(r#"{"checkboxes": false, "footnotes": true}"#).unwrap();
        assert!(!opts.checkboxes);
        assert!(opts.obsidian_links);
    }

    #[tokio::test]
    async fn test_all_passes_disabled_leaves_tree_unchanged() {
        let markup = "<p>text ^ref</p>\
                      <img src=\"https://youtu.be/dQw4w9WgXcQ\">\
                      <input type=\"checkbox\" disabled>\
                      <a href=\"obsidian://open\">x</a>";
        let before = Document::parse(markup);
        let output = rewriter(RewriteOptions::none()).rewrite(before.clone()).await;
        assert_eq!(output.doc, before);
        assert!(output.store.is_empty());
        assert!(output.store.tree.is_none());
    }

    #[tokio::test]
    async fn test_full_run_applies_every_pass() {
        let markup = "<blockquote><p>wise words</p></blockquote><p>caption</p><p>^q</p>\
                      <img src=\"https://www.youtube.com/watch?v=dQw4w9WgXcQ\">\
                      <ul><li class=\"task-list-item\">\
                      <input type=\"checkbox\" checked> done</li></ul>\
                      <pre><code class=\"mermaid\">graph TD</code></pre>\
                      <a href=\"obsidian://open?vault=v\">open</a>";
        let output = rewriter(RewriteOptions::default())
            .rewrite(Document::parse(markup))
            .await;
        let root = &output.doc.root;

        let quote = find_by_tag(root, "blockquote").unwrap();
        assert_eq!(quote.get_attr_str("id"), Some("q"));
        assert_eq!(output.store.get("q").unwrap().tag, "blockquote");

        assert!(find_by_tag(root, "iframe").is_some());

        let item = find_by_tag(root, "li").unwrap();
        assert_eq!(item.get_attr_str("data-task"), Some("x"));

        let pre = find_by_tag(root, "pre").unwrap();
        assert_eq!(pre.children.len(), 3);

        let link = find_by_tag(root, "a").unwrap();
        assert!(link.has_class("obsidian-uri"));
    }

    #[tokio::test]
    async fn test_disabled_pass_is_skipped() {
        let mut opts = RewriteOptions::default();
        opts.youtube_embeds = false;
        let output = rewriter(opts)
            .rewrite(Document::parse(
                "<img src=\"https://youtu.be/dQw4w9WgXcQ\"><p>x ^id</p>",
            ))
            .await;
        assert!(find_by_tag(&output.doc.root, "iframe").is_none());
        assert!(find_by_tag(&output.doc.root, "img").is_some());
        assert!(output.store.contains("id"));
    }

    #[tokio::test]
    async fn test_store_reflects_later_pass_rewrites() {
        // The id lands on the li before the checkbox pass runs; the snapshot
        // must still show the annotated element.
        let output = rewriter(RewriteOptions::default())
            .rewrite(Document::parse(
                "<ul><li class=\"task-list-item\">\
                 <input type=\"checkbox\" checked> done ^task1</li></ul>",
            ))
            .await;
        let stored = output.store.get("task1").unwrap();
        assert_eq!(stored.get_attr_str("data-task"), Some("x"));
        assert!(stored.has_class("is-checked"));
    }

    #[tokio::test]
    async fn test_failed_tweet_lookup_degrades_to_fallback() {
        let output = rewriter(RewriteOptions::default())
            .rewrite(Document::parse(
                "<img src=\"https://twitter.com/alice/status/1\">",
            ))
            .await;
        let quote = find_by_tag(&output.doc.root, "blockquote").unwrap();
        assert!(quote.has_class("external-embed"));
        assert_eq!(find_all_by_tag(&output.doc.root, "img").len(), 0);
    }

    #[test]
    fn test_pipeline_chains_in_order() {
        struct Tag(&'static str);
        impl Transform for Tag {
            fn transform(self, mut doc: Document) -> Document {
                doc.root.set_attr(self.0, true);
                doc
            }
        }
        let doc = Pipeline::new(Document::fragment(vec![]))
            .pipe(Tag("first"))
            .pipe_if(false, Tag("second"))
            .pipe(Tag("third"))
            .into_inner();
        assert!(doc.root.has_attr("first"));
        assert!(!doc.root.has_attr("second"));
        assert!(doc.root.has_attr("third"));
    }
}
