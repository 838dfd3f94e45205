//! # Render Bridge
//!
//! Turns a [`ContentTree`] into host output by walking node references and
//! handing each node to the renderer registered for its [`TypeTag`].
//!
//! - The root node is transparent: it never reaches a renderer, only its
//!   children do.
//! - Every rendered node carries the identifying attribute with its id.
//! - Text children become leaves tagged `"<nodeId>.<childIndex>"` so the
//!   selection layer can tell them apart without them being tree entries.
//! - Unresolved references, unknown tags and nodes that would recurse into
//!   their own ancestry all render as empty slots (`None`) rather than errors.
//!
//! Rendering keeps no state between calls; the same tree always yields the
//! same output.

pub mod html;

use std::collections::{HashMap, HashSet};

use crate::content::{ChildRef, ContentNode, ContentTree, NodeId, TypeTag};

/// What a node renderer receives
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProps<O> {
    /// Name of the identifying attribute, e.g. `data-lapis`
    pub attribute: String,
    /// Value for the identifying attribute; also usable as a stable key
    pub id: NodeId,
    pub node_type: TypeTag,
    /// Rendered children in order, `None` marking an empty slot
    pub children: Vec<Option<O>>,
}

/// A text child rendered as a leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    pub attribute: String,
    /// Synthetic `"<owner>.<index>"` id
    pub id: NodeId,
    pub text: String,
}

type NodeRenderer<O> = Box<dyn Fn(RenderProps<O>) -> Option<O>>;
type TextRenderer<O> = Box<dyn Fn(TextLeaf) -> O>;
type FallbackRenderer<O> = Box<dyn Fn(RenderProps<O>) -> Option<O>>;

/// Host-supplied mapping of type tag → renderer
pub struct RendererRegistry<O> {
    nodes: HashMap<TypeTag, NodeRenderer<O>>,
    text: TextRenderer<O>,
    fallback: Option<FallbackRenderer<O>>,
}

impl<O> RendererRegistry<O> {
    /// Registry with no node renderers; text leaves go through `text`
    pub fn new(text: impl Fn(TextLeaf) -> O + 'static) -> Self {
        Self {
            nodes: HashMap::new(),
            text: Box::new(text),
            fallback: None,
        }
    }

    /// Register (or replace) the renderer for `tag`
    pub fn register(
        &mut self,
        tag: impl Into<TypeTag>,
        render: impl Fn(RenderProps<O>) -> Option<O> + 'static,
    ) {
        self.nodes.insert(tag.into(), Box::new(render));
    }

    pub fn with_renderer(
        mut self,
        tag: impl Into<TypeTag>,
        render: impl Fn(RenderProps<O>) -> Option<O> + 'static,
    ) -> Self {
        self.register(tag, render);
        self
    }

    /// Renderer for tags nobody registered. Without one they render nothing.
    pub fn with_fallback(mut self, render: impl Fn(RenderProps<O>) -> Option<O> + 'static) -> Self {
        self.fallback = Some(Box::new(render));
        self
    }

    pub fn has_renderer(&self, tag: &str) -> bool {
        self.nodes.contains_key(tag)
    }

    fn render_node(&self, props: RenderProps<O>) -> Option<O> {
        if let Some(render) = self.nodes.get(props.node_type.as_str()) {
            return render(props);
        }
        match &self.fallback {
            Some(fallback) => fallback(props),
            None => {
                log::trace!("No renderer for type `{}` (node `{}`)", props.node_type, props.id);
                None
            }
        }
    }

    fn render_text(&self, leaf: TextLeaf) -> O {
        (self.text)(leaf)
    }
}

/// One rendering pass over a tree
pub struct RenderBridge<'a, O> {
    tree: &'a ContentTree,
    root_id: &'a NodeId,
    attribute: &'a str,
    registry: &'a RendererRegistry<O>,
}

impl<'a, O> RenderBridge<'a, O> {
    pub fn new(
        tree: &'a ContentTree,
        root_id: &'a NodeId,
        attribute: &'a str,
        registry: &'a RendererRegistry<O>,
    ) -> Self {
        Self {
            tree,
            root_id,
            attribute,
            registry,
        }
    }

    /// Render `node_id`.
    ///
    /// The root yields the slots of its children; any other node yields
    /// exactly one slot.
    pub fn render(&self, node_id: &NodeId) -> Vec<Option<O>> {
        let is_root = node_id == self.root_id;
        let Some(node) = self.tree.get(node_id.as_str()) else {
            log::trace!("Unresolved reference to `{node_id}`; rendering an empty slot");
            return if is_root { Vec::new() } else { vec![None] };
        };
        self.walk(node_id, node, is_root)
    }

    /// Depth-first walk with an explicit stack, so nesting depth is bounded
    /// by memory rather than the call stack.
    fn walk<'t>(
        &self,
        start: &'t NodeId,
        node: &'t ContentNode,
        transparent: bool,
    ) -> Vec<Option<O>>
    where
        'a: 't,
    {
        let mut ancestors: HashSet<&'t str> = HashSet::from([start.as_str()]);
        let mut stack = vec![Frame::new(start, node)];

        while let Some(frame) = stack.last_mut() {
            let owner: &'t ContentNode = frame.node;
            let index = frame.next;
            frame.next += 1;

            match owner.child_refs().get(index) {
                Some(ChildRef::Text(text)) => {
                    let leaf = self.registry.render_text(TextLeaf {
                        attribute: self.attribute.to_string(),
                        id: frame.id.leaf(index),
                        text: text.clone(),
                    });
                    frame.slots.push(Some(leaf));
                }
                Some(ChildRef::Node(id)) => match self.tree.get(id.as_str()) {
                    None => {
                        log::trace!("Unresolved reference to `{id}`; rendering an empty slot");
                        frame.slots.push(None);
                    }
                    Some(_) if ancestors.contains(id.as_str()) => {
                        log::warn!("Node `{id}` appears inside itself; skipping the repeat");
                        frame.slots.push(None);
                    }
                    Some(child) => {
                        ancestors.insert(id.as_str());
                        stack.push(Frame::new(id, child));
                    }
                },
                None => {
                    let Some(done) = stack.pop() else {
                        break;
                    };
                    ancestors.remove(done.id.as_str());
                    if stack.is_empty() && transparent {
                        return done.slots;
                    }
                    let slot = self.registry.render_node(RenderProps {
                        attribute: self.attribute.to_string(),
                        id: done.id.clone(),
                        node_type: done.node.node_type.clone(),
                        children: done.slots,
                    });
                    match stack.last_mut() {
                        Some(parent) => parent.slots.push(slot),
                        None => return vec![slot],
                    }
                }
            }
        }
        Vec::new()
    }
}

/// A node whose children are still being rendered
struct Frame<'t, O> {
    id: &'t NodeId,
    node: &'t ContentNode,
    /// Index of the next child to visit
    next: usize,
    slots: Vec<Option<O>>,
}

impl<'t, O> Frame<'t, O> {
    fn new(id: &'t NodeId, node: &'t ContentNode) -> Self {
        Self {
            id,
            node,
            next: 0,
            slots: Vec::with_capacity(node.child_refs().len()),
        }
    }
}
