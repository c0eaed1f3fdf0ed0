//! YouTube embed rewriter.
//!
//! Obsidian renders `![](https://www.youtube.com/watch?v=...)` as a plain
//! image. This pass recognizes video/playlist URL shapes on `img` sources and
//! swaps the image for an embed iframe.
//!
//! | Extracted | Embed URL |
//! |-----------|-----------|
//! | video + playlist | `https://www.youtube.com/embed/{video}?list={list}` |
//! | video only | `https://www.youtube.com/embed/{video}` |
//! | playlist only | `https://www.youtube.com/embed/videoseries?list={list}` |
//! | neither | image left untouched |

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::visit::{Flow, walk};
use crate::dom::{Document, Element, Node};
use crate::pipeline::Transform;

static VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").unwrap()
});
static PLAYLIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([^#?&]*)").unwrap());

const EMBED_CLASSES: &[&str] = &["external-embed", "youtube"];
/// Video ids are always exactly this long; any other capture is noise.
const VIDEO_ID_LEN: usize = 11;

/// Replaces recognized YouTube images with embed iframes.
pub struct YouTubeEmbed;

impl YouTubeEmbed {
    fn embed_url(src: &str) -> Option<String> {
        let video_id = VIDEO
            .captures(src)
            .map(|caps| caps[2].to_string())
            .filter(|id| id.len() == VIDEO_ID_LEN);
        let playlist_id = PLAYLIST
            .captures(src)
            .map(|caps| caps[1].to_string())
            .filter(|id| !id.is_empty());

        match (video_id, playlist_id) {
            (Some(video), Some(list)) => {
                Some(format!("https://www.youtube.com/embed/{video}?list={list}"))
            }
            (Some(video), None) => Some(format!("https://www.youtube.com/embed/{video}")),
            (None, Some(list)) => Some(format!(
                "https://www.youtube.com/embed/videoseries?list={list}"
            )),
            (None, None) => None,
        }
    }

    fn iframe(src: String) -> Element {
        Element::new("iframe")
            .with_attr("class", EMBED_CLASSES)
            .with_attr("allow", "fullscreen")
            .with_attr("frameborder", 0)
            .with_attr("width", "600px")
            .with_attr("src", src)
    }
}

impl Transform for YouTubeEmbed {
    fn transform(self, mut doc: Document) -> Document {
        walk(&mut doc.root, &mut |children, index| {
            let Some(url) = children[index]
                .as_element()
                .filter(|elem| elem.is_tag("img"))
                .and_then(|elem| elem.get_attr_str("src"))
                .and_then(Self::embed_url)
            else {
                return Flow::Descend;
            };
            children[index] = Node::elem(Self::iframe(url));
            // Replaced in place; the iframe has nothing to descend into.
            Flow::SkipChildren
        });
        doc
    }
}
