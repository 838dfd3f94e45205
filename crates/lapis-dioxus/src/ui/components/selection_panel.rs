use dioxus::prelude::*;
use lapis_engine::{AncestorPath, SelectionEndpoint};
use std::rc::Rc;

use crate::demo::describe;
use crate::ui::DomEditor;

fn endpoint(endpoint: &SelectionEndpoint<AncestorPath>) -> String {
    let id = endpoint.id.as_ref().map_or("none", |id| id.as_str());
    match (endpoint.leaf, endpoint.offset) {
        (Some(leaf), Some(offset)) => format!("{id} (text {leaf}) @ {offset}"),
        (None, Some(offset)) => format!("{id} @ {offset}"),
        (_, None) => id.to_string(),
    }
}

/// Live view of the logical selection
#[component]
pub fn SelectionPanel(revision: Signal<u64>) -> Element {
    let editor = use_context::<Rc<DomEditor>>();
    let generation = revision();
    let selection = editor.selection();

    let summary = describe(&selection);
    let start = endpoint(&selection.start);
    let end = endpoint(&selection.end);
    let parent = selection
        .parent
        .id
        .as_ref()
        .map_or("none".to_string(), |id| id.to_string());
    let collapsed = selection.is_collapsed();

    rsx! {
        aside {
            class: "selection-panel",
            h2 { "Selection" }
            p { "{summary}" }
            dl {
                dt { "Start" }
                dd { "{start}" }
                dt { "End" }
                dd { "{end}" }
                dt { "Parent" }
                dd { "{parent}" }
                dt { "Collapsed" }
                dd { "{collapsed}" }
                dt { "Generation" }
                dd { "{generation}" }
            }
        }
    }
}
