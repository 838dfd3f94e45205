//! Glue between the webview DOM and the engine's host traits.

use dioxus::html::Key;
use dioxus::prelude::*;
use lapis_engine::{Generation, KeyEvent, PathRange, SelectionHub};

/// Dioxus keyboard event as seen by the engine
pub struct DomKeyEvent(pub Event<KeyboardData>);

impl DomKeyEvent {
    pub fn key(&self) -> Key {
        self.0.key()
    }
}

impl KeyEvent for DomKeyEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

/// Listens for `selectionchange` and sends the active range's containers as
/// attribute paths, nearest node first.
const SELECTION_SCRIPT: &str = r#"
const ATTRIBUTE = "__ATTRIBUTE__";

const capture = (node) => {
    const values = [];
    for (let current = node; current; current = current.parentNode) {
        values.push(current.nodeType === Node.ELEMENT_NODE ? current.getAttribute(ATTRIBUTE) : null);
    }
    return { attribute: ATTRIBUTE, values };
};

// A remounted bridge replaces the listener of the previous one
if (window.__lapisSelectionListener) {
    document.removeEventListener("selectionchange", window.__lapisSelectionListener);
}

const listener = () => {
    const selection = document.getSelection();
    if (!selection || selection.rangeCount === 0) {
        dioxus.send(null);
        return;
    }
    const range = selection.getRangeAt(0);
    dioxus.send({
        start: capture(range.startContainer),
        start_offset: range.startOffset,
        end: capture(range.endContainer),
        end_offset: range.endOffset,
        common_ancestor: capture(range.commonAncestorContainer),
        collapsed: range.collapsed,
    });
};
window.__lapisSelectionListener = listener;
document.addEventListener("selectionchange", listener);

await new Promise(() => {});
"#;

pub fn selection_script(attribute: &str) -> String {
    SELECTION_SCRIPT.replace("__ATTRIBUTE__", attribute)
}

/// Forward DOM selection changes into `hub` for as long as the calling
/// component is mounted, mirroring the editor generation into `revision`.
pub fn use_selection_bridge(
    attribute: &'static str,
    hub: SelectionHub<PathRange>,
    generation: Generation,
    revision: Signal<u64>,
) {
    use_future(move || {
        let hub = hub.clone();
        let generation = generation.clone();
        let mut revision = revision;
        async move {
            let mut bridge = document::eval(&selection_script(attribute));
            loop {
                match bridge.recv::<Option<PathRange>>().await {
                    Ok(range) => {
                        hub.notify(range);
                        revision.set(generation.current());
                    }
                    Err(err) => {
                        log::warn!("Selection bridge stopped: {err:?}");
                        break;
                    }
                }
            }
        }
    });
}
