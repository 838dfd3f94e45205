use dioxus::prelude::*;
use lapis_engine::Generation;
use lapis_engine::coordinator::KeyHandler;
use std::rc::Rc;

use crate::dom::DomKeyEvent;
use crate::ui::DomEditor;
use crate::ui::render::tag;

/// The editor root: carries the root id and key handlers, holds the rendered
/// content. The element is focusable but not editable, so the webview never
/// applies an edit of its own; every key goes through the editor core.
#[component]
pub fn Editor(attribute: &'static str, revision: Signal<u64>) -> Element {
    let editor = use_context::<Rc<DomEditor>>();
    let _ = revision();

    let props = editor.get_container_props();
    let root = tag(attribute, &props.root_id);
    let on_key_down = key_listener(props.on_key_down, editor.generation_handle(), revision);
    let on_key_up = key_listener(props.on_key_up, editor.generation_handle(), revision);

    rsx! {
        div {
            class: "lapis-editor",
            tabindex: "0",
            spellcheck: "false",
            onkeydown: on_key_down,
            onkeyup: on_key_up,
            ..root,
            {editor.get_content().into_iter().flatten()}
        }
    }
}

fn key_listener(
    handler: KeyHandler<DomKeyEvent>,
    generation: Generation,
    mut revision: Signal<u64>,
) -> impl FnMut(Event<KeyboardData>) + 'static {
    move |event| {
        handler(&DomKeyEvent(event));
        revision.set(generation.current());
    }
}
