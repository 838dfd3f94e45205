use dioxus::prelude::*;
use lapis_config::Config;
use lapis_engine::{ContentTree, Coordinator, NodeId, PathRange, SelectionHub};
use std::rc::Rc;

use super::DomEditor;
use super::components::{Editor, SelectionPanel};
use super::render::editor_registry;
use crate::demo;
use crate::dom::use_selection_bridge;

const EDITOR_CSS: &str = include_str!("../assets/editor.css");

#[component]
pub fn App(attribute: &'static str, config: Config, content: ContentTree) -> Element {
    let hub = use_hook(SelectionHub::<PathRange>::new);
    let editor: Rc<DomEditor> = use_hook(|| {
        let options = config
            .coordinator_options()
            .with_default_content(content.clone());
        let root = NodeId::new(config.root_id.as_str());
        Rc::new(Coordinator::mount(
            options,
            editor_registry(attribute),
            demo::callbacks(root),
            hub.clone(),
        ))
    });

    // Mirrors the editor generation; reading it re-renders on every change
    let revision = use_signal(|| editor.generation());
    use_context_provider(|| editor.clone());
    use_selection_bridge(attribute, hub, editor.generation_handle(), revision);
    use_drop({
        let editor = editor.clone();
        move || editor.teardown()
    });

    rsx! {
        style { {EDITOR_CSS} }
        div {
            class: "app-container",
            main {
                class: "main-content",
                h1 { "Hello application!" }
                Editor { attribute, revision }
            }
            SelectionPanel { revision }
        }
    }
}
