//! Mermaid diagram expansion scaffolding.
//!
//! Client-side script renders `code.mermaid` blocks into diagrams and drives a
//! full-screen viewer. This pass injects the static scaffolding that script
//! expects next to every diagram code block: an expand button before it and
//! an empty viewer container after it.

use crate::dom::visit::{Flow, walk};
use crate::dom::{Document, Element, Node};
use crate::pipeline::Transform;

const CLASS_MERMAID: &str = "mermaid";

const ICON_PATH: &str = "M3.72 3.72a.75.75 0 011.06 1.06L2.56 7h10.88l-2.22-2.22a.75.75 \
                         0 011.06-1.06l3.5 3.5a.75.75 0 010 1.06l-3.5 3.5a.75.75 0 \
                         11-1.06-1.06l2.22-2.22H2.56l2.22 2.22a.75.75 0 11-1.06 \
                         1.06l-3.5-3.5a.75.75 0 010-1.06l3.5-3.5z";

/// Wraps each mermaid code block with expand-button and viewer scaffolding.
pub struct Mermaid;

impl Mermaid {
    fn expand_button() -> Element {
        let icon = Element::new("svg")
            .with_attr("width", 16)
            .with_attr("height", 16)
            .with_attr("viewBox", "0 0 16 16")
            .with_attr("fill", "currentColor")
            .with_child(Node::elem(Element::new("path").with_attr("d", ICON_PATH)));
        Element::new("button")
            .with_attr("class", "expand-button")
            .with_attr("aria-label", "Expand mermaid diagram")
            .with_attr("data-view-component", true)
            .with_child(Node::elem(icon))
    }

    fn viewer_container() -> Element {
        Element::new("div")
            .with_attr("id", "mermaid-container")
            .with_attr("role", "dialog")
            .with_child(Node::elem(
                Element::new("div").with_attr("id", "mermaid-space").with_child(
                    Node::elem(Element::new("div").with_attr("class", "mermaid-content")),
                ),
            ))
    }
}

impl Transform for Mermaid {
    fn transform(self, mut doc: Document) -> Document {
        walk(&mut doc.root, &mut |children, index| {
            let is_diagram = children[index]
                .as_element()
                .is_some_and(|elem| elem.is_tag("code") && elem.has_class(CLASS_MERMAID));
            if !is_diagram {
                return Flow::Descend;
            }

            // The parent's child list is rebuilt around the diagram: siblings
            // are dropped and the code block is sandwiched between the button
            // and the viewer.
            let code = children.remove(index);
            *children = vec![
                Node::elem(Self::expand_button()),
                code,
                Node::elem(Self::viewer_container()),
            ];
            Flow::ReplacedChildren
        });
        doc
    }
}
