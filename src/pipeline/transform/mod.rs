//! Obsidian-specific tree transforms.
//!
//! Each transform rewrites one rendering artifact, enabling composition via
//! Pipeline.
//!
//! # Modules
//!
//! - `block_refs`: Resolves `^token` markers into ids + store entries
//! - `youtube`: Swaps YouTube image links for embed iframes
//! - `tweet`: Swaps tweet image links for fetched embeds (async)
//! - `checkbox`: Re-enables and annotates task-list checkboxes
//! - `mermaid`: Injects diagram expand-button and viewer scaffolding
//! - `obsidian_uri`: Tags `obsidian://` links for client-side handling

mod block_refs;
mod checkbox;
mod mermaid;
mod obsidian_uri;
mod tweet;
mod youtube;

pub use block_refs::BlockReferences;
pub use checkbox::Checkbox;
pub use mermaid::Mermaid;
pub use obsidian_uri::ObsidianUri;
pub use tweet::TweetEmbed;
pub use youtube::YouTubeEmbed;
