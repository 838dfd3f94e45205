//! The sample editor: content, key handling and selection logging.

use dioxus::html::Key;
use lapis_engine::io::parse_toml_content;
use lapis_engine::{
    AncestorPath, ContentNode, ContentTree, HostCallbacks, LoadError, LogicalSelection, NodeId,
};

use crate::dom::DomKeyEvent;

const DEMO_CONTENT: &str = include_str!("assets/demo.toml");

pub fn demo_content() -> Result<ContentTree, LoadError> {
    parse_toml_content(DEMO_CONTENT)
}

/// Append an empty paragraph to the end of `root`
pub fn append_paragraph(content: &ContentTree, root: &str) -> Option<ContentTree> {
    let mut next = content.clone();
    let id = NodeId::generate();
    let parent = next.get(root)?.clone().with_node(id.clone());
    next.insert(parent);
    next.insert(ContentNode::new(id, "text").with_text(""));
    Some(next)
}

pub fn callbacks(root: NodeId) -> HostCallbacks<DomKeyEvent, AncestorPath> {
    HostCallbacks::new()
        .on_key_down(move |event: &DomKeyEvent, content: &ContentTree, selection| {
            let key = event.key();
            log::info!("Key down {key:?} at {}", describe(selection));
            match key {
                Key::Enter => append_paragraph(content, root.as_str()),
                _ => None,
            }
        })
        .on_selection(|content: &ContentTree, selection| {
            log::info!(
                "Selection {} ({} nodes)",
                describe(selection),
                content.len()
            );
        })
}

/// `start@offset..end@offset`, `?` for unmapped ends
pub fn describe(selection: &LogicalSelection<AncestorPath>) -> String {
    if selection.is_unresolved() {
        return "nothing".to_string();
    }
    let endpoint = |id: &Option<NodeId>, offset: Option<usize>| {
        let id = id.as_ref().map_or("?", NodeId::as_str);
        match offset {
            Some(offset) => format!("{id}@{offset}"),
            None => id.to_string(),
        }
    };
    let start = endpoint(&selection.start.id, selection.start.offset);
    if selection.is_collapsed() {
        return start;
    }
    format!("{start}..{}", endpoint(&selection.end.id, selection.end.offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapis_engine::SelectionEndpoint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_content_is_valid() {
        let content = demo_content().unwrap();

        assert_eq!(content.validate("root"), Ok(()));
        assert_eq!(
            content.text_of("root"),
            "Quas Wex the quick brown fox jumps over"
        );
    }

    #[test]
    fn test_append_paragraph_adds_empty_text_node() {
        let content = demo_content().unwrap();

        let next = append_paragraph(&content, "root").unwrap();

        let root = next.get("root").unwrap().child_refs();
        assert_eq!(root.len(), 2);
        assert_eq!(next.len(), content.len() + 1);
        assert_eq!(next.validate("root"), Ok(()));
        assert_eq!(next.text_of("root"), content.text_of("root"));
    }

    #[test]
    fn test_append_paragraph_without_root_is_noop() {
        assert_eq!(append_paragraph(&ContentTree::new(), "root"), None);
    }

    #[test]
    fn test_describe_selection() {
        let caret = LogicalSelection {
            start: SelectionEndpoint {
                id: Some(NodeId::new("wex")),
                offset: Some(2),
                ..SelectionEndpoint::default()
            },
            end: SelectionEndpoint {
                id: Some(NodeId::new("wex")),
                offset: Some(2),
                ..SelectionEndpoint::default()
            },
            ..LogicalSelection::default()
        };
        let range = LogicalSelection {
            end: SelectionEndpoint {
                id: Some(NodeId::new("exort")),
                offset: Some(5),
                ..SelectionEndpoint::default()
            },
            ..caret.clone()
        };

        assert_eq!(describe(&caret), "wex@2");
        assert_eq!(describe(&range), "wex@2..exort@5");
        assert_eq!(describe(&LogicalSelection::default()), "nothing");
    }
}
