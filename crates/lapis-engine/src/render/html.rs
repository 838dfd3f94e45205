//! HTML string output for the render bridge.
//!
//! Useful for server-side rendering and for checking what a tree renders to
//! without a UI toolkit in the loop.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{RenderProps, RendererRegistry, TextLeaf};

/// Type tag → element pairs registered by [`html_registry`]
pub const DEFAULT_ELEMENTS: &[(&str, &str)] = &[
    ("text", "p"),
    ("span", "span"),
    ("bold", "b"),
    ("italic", "i"),
    ("header", "h1"),
    ("code", "code"),
    ("code-block", "pre"),
    ("quote", "blockquote"),
    ("list", "ul"),
    ("list-item", "li"),
];

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// Renderer emitting `<element attr="id">children</element>`
pub fn html_element(element: &'static str) -> impl Fn(RenderProps<String>) -> Option<String> {
    move |props| {
        let attribute = format!(
            "{}=\"{}\"",
            props.attribute,
            encode_double_quoted_attribute(props.id.as_str())
        );
        if VOID_ELEMENTS.contains(&element) {
            return Some(format!("<{element} {attribute}>"));
        }
        Some(format!(
            "<{element} {attribute}>{}</{element}>",
            join_html(&props.children)
        ))
    }
}

/// Text leaves become spans carrying their synthetic id
pub fn html_text(leaf: TextLeaf) -> String {
    format!(
        "<span {}=\"{}\">{}</span>",
        leaf.attribute,
        encode_double_quoted_attribute(leaf.id.as_str()),
        encode_text(&leaf.text)
    )
}

/// Concatenate rendered slots, skipping empty ones
pub fn join_html(slots: &[Option<String>]) -> String {
    slots.iter().flatten().map(String::as_str).collect()
}

/// Registry covering [`DEFAULT_ELEMENTS`] plus `rule` → `<hr>`.
///
/// Unknown tags render nothing; add a fallback or more renderers to taste.
pub fn html_registry() -> RendererRegistry<String> {
    let mut registry = RendererRegistry::new(html_text);
    for (tag, element) in DEFAULT_ELEMENTS {
        registry.register(*tag, html_element(*element));
    }
    registry.register("rule", html_element("hr"));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentNode, ContentTree, NodeId};
    use crate::render::RenderBridge;

    fn render(tree: &ContentTree) -> String {
        let root = NodeId::new("root");
        let registry = html_registry();
        join_html(&RenderBridge::new(tree, &root, "data-lapis", &registry).render(&root))
    }

    #[test]
    fn test_renders_nested_tree() {
        let tree = ContentTree::from_nodes([
            ContentNode::new("root", "root").with_node("quas").with_node("b"),
            ContentNode::new("quas", "header").with_text("Quas ").with_node("exort"),
            ContentNode::new("exort", "italic").with_text("fox"),
            ContentNode::new("b", "text").with_text("Bye"),
        ]);

        insta::assert_snapshot!(
            render(&tree),
            @r#"<h1 data-lapis="quas"><span data-lapis="quas.0">Quas </span><i data-lapis="exort"><span data-lapis="exort.0">fox</span></i></h1><p data-lapis="b"><span data-lapis="b.0">Bye</span></p>"#
        );
    }

    #[test]
    fn test_escapes_text_and_ids() {
        let tree = ContentTree::from_nodes([
            ContentNode::new("root", "root").with_node("a\"b"),
            ContentNode::new("a\"b", "text").with_text("<script>&"),
        ]);

        insta::assert_snapshot!(
            render(&tree),
            @r#"<p data-lapis="a&quot;b"><span data-lapis="a&quot;b.0">&lt;script&gt;&amp;</span></p>"#
        );
    }

    #[test]
    fn test_rule_is_void_and_unknown_tags_vanish() {
        let tree = ContentTree::from_nodes([
            ContentNode::new("root", "root")
                .with_node("hr")
                .with_node("odd")
                .with_node("ghost"),
            ContentNode::new("hr", "rule"),
            ContentNode::new("odd", "marquee").with_text("gone"),
        ]);

        assert_eq!(render(&tree), r#"<hr data-lapis="hr">"#);
    }
}
