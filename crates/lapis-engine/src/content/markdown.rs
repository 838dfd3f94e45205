//! Markdown import.
//!
//! Builds a [`ContentTree`] from CommonMark source so hosts can seed an editor
//! with existing documents. Block and inline constructs map onto the type tags
//! the demo renderer understands; anything without a mapping is flattened into
//! its parent.

use pulldown_cmark::{Event, Parser, Tag};

use super::{ChildRef, ContentNode, ContentTree, NodeId};

/// Type tag for a markdown construct, `None` when it has no node of its own
fn type_for(tag: &Tag<'_>) -> Option<&'static str> {
    match tag {
        Tag::Heading { .. } => Some("header"),
        Tag::Paragraph => Some("text"),
        Tag::Emphasis => Some("italic"),
        Tag::Strong => Some("bold"),
        Tag::List(_) => Some("list"),
        Tag::Item => Some("list-item"),
        Tag::BlockQuote(_) => Some("quote"),
        Tag::CodeBlock(_) => Some("code-block"),
        _ => None,
    }
}

struct Importer {
    tree: ContentTree,
    /// Open constructs; `None` marks one that was flattened
    stack: Vec<Option<NodeId>>,
    next_id: usize,
}

impl Importer {
    fn new(root: &str) -> Self {
        let root = NodeId::new(root);
        let mut tree = ContentTree::new();
        tree.insert(ContentNode {
            children: Some(Vec::new()),
            ..ContentNode::new(root.clone(), "root")
        });
        Self {
            tree,
            stack: vec![Some(root)],
            next_id: 0,
        }
    }

    /// Next `"<type>-<n>"` id not already in the tree
    fn fresh_id(&mut self, node_type: &str) -> NodeId {
        loop {
            self.next_id += 1;
            let id = NodeId::new(format!("{node_type}-{}", self.next_id));
            if !self.tree.contains(id.as_str()) {
                return id;
            }
        }
    }

    fn current_parent(&self) -> Option<&NodeId> {
        self.stack.iter().rev().find_map(Option::as_ref)
    }

    fn append(&mut self, child: ChildRef) {
        let Some(parent) = self.current_parent().cloned() else {
            return;
        };
        let Some(node) = self.tree.get_mut(parent.as_str()) else {
            return;
        };
        let children = node.children.get_or_insert_with(Vec::new);
        // Adjacent text events are one leaf
        if let (ChildRef::Text(new), Some(ChildRef::Text(last))) = (&child, children.last_mut()) {
            last.push_str(new);
            return;
        }
        children.push(child);
    }

    fn open(&mut self, node_type: &str) {
        let id = self.fresh_id(node_type);
        self.append(ChildRef::Node(id.clone()));
        self.tree.insert(ContentNode {
            children: Some(Vec::new()),
            ..ContentNode::new(id.clone(), node_type)
        });
        self.stack.push(Some(id));
    }

    fn leaf(&mut self, node: ContentNode) {
        self.append(ChildRef::Node(node.id.clone()));
        self.tree.insert(node);
    }

    fn finish(self) -> ContentTree {
        self.tree
    }
}

/// Import markdown `source` into a tree rooted at `root`.
///
/// Generated ids are `"<type>-<n>"`, numbered in document order, so importing
/// the same source twice yields the same tree. A number whose id is already
/// taken (only ever by `root`) is skipped.
pub fn import_markdown(source: &str, root: &str) -> ContentTree {
    let mut importer = Importer::new(root);

    for event in Parser::new(source) {
        match event {
            Event::Start(tag) => match type_for(&tag) {
                Some(node_type) => importer.open(node_type),
                None => importer.stack.push(None),
            },
            Event::End(_) => {
                // The root entry is never closed by the parser
                if importer.stack.len() > 1 {
                    importer.stack.pop();
                }
            }
            Event::Text(text) => importer.append(ChildRef::text(text.to_string())),
            Event::Code(code) => {
                let id = importer.fresh_id("code");
                importer.leaf(ContentNode::new(id, "code").with_text(code.to_string()));
            }
            Event::SoftBreak | Event::HardBreak => importer.append(ChildRef::text("\n")),
            Event::Rule => {
                let id = importer.fresh_id("rule");
                importer.leaf(ContentNode::new(id, "rule"));
            }
            _ => {}
        }
    }

    let tree = importer.finish();
    log::debug!("Imported markdown into {} content nodes", tree.len());
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_heading_and_paragraph() {
        let tree = import_markdown("# Quas\n\nWex *exort*", "root");

        assert_eq!(
            tree.get("root").unwrap().child_refs(),
            &[ChildRef::node("header-1"), ChildRef::node("text-2")]
        );
        assert_eq!(
            tree.get("header-1").unwrap().child_refs(),
            &[ChildRef::text("Quas")]
        );
        assert_eq!(
            tree.get("text-2").unwrap().child_refs(),
            &[ChildRef::text("Wex "), ChildRef::node("italic-3")]
        );
        assert_eq!(tree.text_of("italic-3"), "exort");
        assert_eq!(tree.validate("root"), Ok(()));
    }

    #[test]
    fn test_import_list_nests_items() {
        let tree = import_markdown("- one\n- **two**\n", "doc");

        let list = &tree.get("doc").unwrap().child_refs()[0];
        assert_eq!(list, &ChildRef::node("list-1"));
        assert_eq!(tree.get("list-1").unwrap().child_refs().len(), 2);
        assert_eq!(tree.text_of("list-1"), "onetwo");
        assert_eq!(tree.validate("doc"), Ok(()));
    }

    #[test]
    fn test_unmapped_constructs_flatten_into_parent() {
        let tree = import_markdown("see [docs](https://example.com) now", "root");

        assert_eq!(
            tree.get("text-1").unwrap().child_refs(),
            &[ChildRef::text("see docs now")]
        );
    }

    #[test]
    fn test_inline_code_becomes_leaf_node() {
        let tree = import_markdown("run `cargo` here", "root");

        assert_eq!(tree.get("code-2").unwrap().node_type.as_str(), "code");
        assert_eq!(tree.text_of("text-1"), "run cargo here");
    }

    #[test]
    fn test_import_is_deterministic() {
        let source = "# A\n\n> quoted _text_\n\n1. first\n2. second\n";
        assert_eq!(
            import_markdown(source, "root"),
            import_markdown(source, "root")
        );
    }

    #[test]
    fn test_empty_source_yields_bare_root() {
        let tree = import_markdown("", "root");
        assert_eq!(tree.len(), 1);
        assert!(tree.get("root").unwrap().child_refs().is_empty());
    }

    #[test]
    fn test_generated_ids_never_replace_root() {
        let tree = import_markdown("hello\n\nworld", "text-1");

        assert_eq!(tree.get("text-1").unwrap().node_type.as_str(), "root");
        assert_eq!(
            tree.get("text-1").unwrap().child_refs(),
            &[ChildRef::node("text-2"), ChildRef::node("text-3")]
        );
        assert_eq!(tree.text_of("text-1"), "helloworld");
        assert_eq!(tree.validate("text-1"), Ok(()));
    }

    #[test]
    fn test_nested_quotes_import_as_deep_chain() {
        let depth = 200;
        let source = format!("{} hi", ">".repeat(depth));

        let tree = import_markdown(&source, "root");

        assert_eq!(tree.validate("root"), Ok(()));
        assert_eq!(tree.len(), depth + 2);
        assert_eq!(tree.text_of("root"), "hi");
        assert_eq!(tree.get(&format!("quote-{depth}")).unwrap().child_refs(), &[
            ChildRef::node(format!("text-{}", depth + 1))
        ]);
    }
}
