//! Post-render cleanup for Obsidian-flavored markdown output.
//!
//! Markdown renderers leave Obsidian-specific constructs half-translated:
//! `^token` block markers stay visible, media links render as dead images,
//! task checkboxes come out disabled and unstyled. This crate parses the
//! rendered fragment into a small mutable tree, runs a fixed sequence of
//! rewrite passes over it, and hands back the cleaned tree plus block-id
//! metadata.
//!
//! # Passes
//!
//! | Pass | Rewrites |
//! |------|----------|
//! | block references | `^token` markers into `id` attributes + store entries |
//! | youtube embeds | YouTube image links into embed iframes |
//! | tweet embeds | tweet image links into fetched embeds (async) |
//! | checkboxes | task-list checkboxes re-enabled and annotated |
//! | mermaid | diagram blocks wrapped with viewer scaffolding |
//! | obsidian links | `obsidian://` anchors tagged for client handling |
//!
//! # Usage
//!
//! ```ignore
//! use vault_html::{Document, Rewriter, RewriteOptions};
//!
//! let rewriter = Rewriter::new(RewriteOptions::default());
//! let output = rewriter.rewrite(Document::parse(html)).await;
//! let cleaned = output.doc;
//! let intro = output.store.get("intro");
//! ```

pub mod dom;
pub mod oembed;
pub mod pipeline;
pub mod store;

pub use dom::{Document, Element, Node, Text, Value};
pub use oembed::{OembedClient, TweetLookup, TweetRendering};
pub use pipeline::{Pipeline, RewriteOptions, RewriteOutput, Rewriter, Transform};
pub use store::BlockStore;
