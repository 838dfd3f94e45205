use dioxus::dioxus_core::Attribute;
use dioxus::prelude::*;
use lapis_engine::{NodeId, RenderProps, RendererRegistry, TextLeaf};

type Build = fn(Vec<Attribute>, Vec<Element>) -> Element;

/// Identifying attribute for one rendered element
pub fn tag(attribute: &'static str, id: &NodeId) -> Vec<Attribute> {
    vec![Attribute::new(attribute, id.to_string(), None, false)]
}

fn element(
    attribute: &'static str,
    build: Build,
) -> impl Fn(RenderProps<Element>) -> Option<Element> {
    move |props| {
        let children = props.children.into_iter().flatten().collect();
        Some(build(tag(attribute, &props.id), children))
    }
}

fn text_leaf(attribute: &'static str) -> impl Fn(TextLeaf) -> Element {
    move |leaf| {
        let attributes = tag(attribute, &leaf.id);
        let text = leaf.text;
        rsx! {
            span { ..attributes, "{text}" }
        }
    }
}

/// Registry rendering content types to DOM elements tagged with `attribute`.
///
/// Unregistered types render nothing.
pub fn editor_registry(attribute: &'static str) -> RendererRegistry<Element> {
    RendererRegistry::new(text_leaf(attribute))
        .with_renderer(
            "text",
            element(attribute, |a, c| rsx! { p { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "span",
            element(attribute, |a, c| rsx! { span { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "bold",
            element(attribute, |a, c| rsx! { b { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "italic",
            element(attribute, |a, c| rsx! { i { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "header",
            element(attribute, |a, c| rsx! { h1 { ..a, {c.into_iter()} } }),
        )
        // Types produced by the markdown importer
        .with_renderer(
            "code",
            element(attribute, |a, c| rsx! { code { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "code-block",
            element(attribute, |a, c| rsx! { pre { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "quote",
            element(attribute, |a, c| rsx! { blockquote { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "list",
            element(attribute, |a, c| rsx! { ul { ..a, {c.into_iter()} } }),
        )
        .with_renderer(
            "list-item",
            element(attribute, |a, c| rsx! { li { ..a, {c.into_iter()} } }),
        )
        .with_renderer("rule", element(attribute, |a, _| rsx! { hr { ..a } }))
}
