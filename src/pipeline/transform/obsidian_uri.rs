//! `obsidian://` link annotator.
//!
//! Links into the Obsidian app need client-side handling (the browser cannot
//! open the scheme directly). This pass tags them with a class and mirrors the
//! target into a data attribute so the script can find and rewrite them
//! without re-parsing hrefs.

use crate::dom::visit::{Flow, walk};
use crate::dom::Document;
use crate::pipeline::Transform;

const SCHEME: &str = "obsidian://";
const CLASS_URI: &str = "obsidian-uri";
const ATTR_URI: &str = "data-obsidian-uri";

/// Tags anchors whose href targets the Obsidian app.
pub struct ObsidianUri;

impl Transform for ObsidianUri {
    fn transform(self, mut doc: Document) -> Document {
        walk(&mut doc.root, &mut |children, index| {
            if let Some(elem) = children[index].as_element_mut()
                && elem.is_tag("a")
                && let Some(href) = elem.get_attr_str("href").map(String::from)
                && href.starts_with(SCHEME)
            {
                elem.add_class(CLASS_URI);
                elem.set_attr(ATTR_URI, href);
            }
            Flow::Descend
        });
        doc
    }
}
