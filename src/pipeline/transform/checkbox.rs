//! Checkbox normalizer.
//!
//! Markdown task lists come out of the renderer as disabled checkboxes with no
//! styling hooks. Two sub-passes fix that:
//!
//! 1. Every `input[type=checkbox]` is re-enabled and classed for styling.
//! 2. Every `li.task-list-item` that directly contains a checkbox gets a
//!    `data-task` attribute (the raw task character when the renderer emitted
//!    one, otherwise `"x"`/`""` from the checked state) and `is-checked` when
//!    the checkbox is checked.

use crate::dom::visit::{Flow, walk};
use crate::dom::{Document, Element, matcher};
use crate::pipeline::Transform;

const CLASS_TOGGLE: &str = "checkbox-toggle";
const CLASS_TASK_ITEM: &str = "task-list-item";
const CLASS_CHECKED: &str = "is-checked";
const ATTR_TASK: &str = "data-task";
const ATTR_TASK_CHAR: &str = "data-task-char";

/// Re-enables and annotates task-list checkboxes.
pub struct Checkbox;

impl Checkbox {
    fn is_checkbox(elem: &Element) -> bool {
        elem.is_tag("input") && elem.get_attr_str("type") == Some("checkbox")
    }

    fn annotate_item(item: &mut Element) {
        let Some(checked) = matcher::find_direct_child(item, Self::is_checkbox)
            .map(|cb| cb.get_attr("checked").is_some_and(|v| v.is_truthy()))
        else {
            return;
        };

        // The renderer's raw task character wins; otherwise derive from the
        // checked state.
        let task = match item.remove_attr(ATTR_TASK_CHAR).and_then(|v| v.as_str().map(String::from))
        {
            Some(ch) => ch,
            None if checked => "x".to_string(),
            None => String::new(),
        };
        item.set_attr(ATTR_TASK, task);
        if checked {
            item.add_class(CLASS_CHECKED);
        }
    }
}

impl Transform for Checkbox {
    fn transform(self, mut doc: Document) -> Document {
        walk(&mut doc.root, &mut |children, index| {
            if let Some(elem) = children[index].as_element_mut()
                && Self::is_checkbox(elem)
            {
                elem.set_attr("disabled", false);
                elem.set_attr("class", CLASS_TOGGLE);
            }
            Flow::Descend
        });

        walk(&mut doc.root, &mut |children, index| {
            if let Some(item) = children[index].as_element_mut()
                && item.is_tag("li")
                && item.has_class(CLASS_TASK_ITEM)
            {
                Self::annotate_item(item);
            }
            Flow::Descend
        });
        doc
    }
}
