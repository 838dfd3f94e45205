//! # Selection Synchronisation
//!
//! Maps the host's native text selection back onto content-tree coordinates.
//!
//! The host environment is described by three small traits:
//!
//! - [`ViewNode`]: a rendered element or text node that can report an
//!   attribute value and its parent.
//! - [`NativeRange`]: the active native range (boundary containers, offsets,
//!   common ancestor, collapsed flag).
//! - [`SelectionSource`]: the process-wide "selection changed" notification
//!   plus access to the active range.
//!
//! [`SelectionTracker`] turns a native range into an immutable
//! [`LogicalSelection`] by walking from each container up to the nearest
//! element carrying the identifying attribute.
//!
//! Offsets are copied verbatim from the native range. They count characters
//! within the view-level container, which is a single text leaf, not the
//! node's full reconstructed text. End offsets are exclusive, exactly as the
//! native range reports them; consumers decide what a range covers.

pub mod hub;
pub mod path;

use std::rc::Rc;

use crate::content::{ContentTree, NodeId};
use crate::generation::Generation;

pub use hub::SelectionHub;
pub use path::{AncestorPath, PathRange};

/// A node in the host's rendered view
pub trait ViewNode: Clone {
    /// Value of attribute `name`, if this node is an element carrying it
    fn attribute(&self, name: &str) -> Option<String>;

    fn parent(&self) -> Option<Self>;
}

/// The host's active selection range
pub trait NativeRange {
    type Node: ViewNode;

    fn start_container(&self) -> Self::Node;
    fn start_offset(&self) -> usize;
    fn end_container(&self) -> Self::Node;
    fn end_offset(&self) -> usize;
    fn common_ancestor_container(&self) -> Self::Node;
    fn collapsed(&self) -> bool;
}

/// Handle returned by [`SelectionSource::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Listener invoked on every native selection change
pub type SelectionListener = Rc<dyn Fn()>;

/// The host's selection-changed notification source
pub trait SelectionSource {
    type Range: NativeRange;

    /// First active range; only one range is supported
    fn active_range(&self) -> Option<Self::Range>;

    fn subscribe(&self, listener: SelectionListener) -> ListenerId;

    /// Returns whether `id` was still subscribed
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// View handle type behind a selection source
pub type ViewHandle<S> = <<S as SelectionSource>::Range as NativeRange>::Node;

/// One boundary of a logical selection
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEndpoint<H> {
    /// Logical node the boundary container belongs to
    pub id: Option<NodeId>,
    /// Index of the text child when the container was a text leaf
    pub leaf: Option<usize>,
    /// Native boundary offset, unclamped
    pub offset: Option<usize>,
    /// Element the id was read from; lookup only
    pub element: Option<H>,
}

impl<H> Default for SelectionEndpoint<H> {
    fn default() -> Self {
        Self {
            id: None,
            leaf: None,
            offset: None,
            element: None,
        }
    }
}

/// Logical node owning the range's common ancestor
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParent<H> {
    pub id: Option<NodeId>,
    pub element: Option<H>,
}

impl<H> Default for SelectionParent<H> {
    fn default() -> Self {
        Self {
            id: None,
            element: None,
        }
    }
}

/// Selection in content-tree coordinates.
///
/// Recomputed from scratch on every native notification. After a content
/// replacement it is stale until the next notification arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalSelection<H> {
    pub start: SelectionEndpoint<H>,
    pub end: SelectionEndpoint<H>,
    pub parent: SelectionParent<H>,
    /// The native range's own collapsed flag
    pub native_collapsed: bool,
}

impl<H> Default for LogicalSelection<H> {
    fn default() -> Self {
        Self {
            start: SelectionEndpoint::default(),
            end: SelectionEndpoint::default(),
            parent: SelectionParent::default(),
            native_collapsed: false,
        }
    }
}

impl<H> LogicalSelection<H> {
    /// Caret state: both ends resolve to the same place
    pub fn is_collapsed(&self) -> bool {
        self.start.id.is_some()
            && self.start.offset.is_some()
            && self.start.id == self.end.id
            && self.start.leaf == self.end.leaf
            && self.start.offset == self.end.offset
    }

    /// Nothing resolved to a logical node
    pub fn is_unresolved(&self) -> bool {
        self.start.id.is_none() && self.end.id.is_none() && self.parent.id.is_none()
    }
}

/// Computes logical selections from native ranges
#[derive(Debug)]
pub struct SelectionTracker<H> {
    attribute: String,
    current: LogicalSelection<H>,
    generation: Generation,
}

impl<H: ViewNode> SelectionTracker<H> {
    pub fn new(attribute: impl Into<String>, generation: Generation) -> Self {
        Self {
            attribute: attribute.into(),
            current: LogicalSelection::default(),
            generation,
        }
    }

    /// Latest snapshot
    pub fn current(&self) -> &LogicalSelection<H> {
        &self.current
    }

    /// Recompute from `range`.
    ///
    /// With no active range the previous snapshot stays and `None` is
    /// returned. Otherwise the new snapshot replaces it wholesale and the
    /// generation counter advances.
    pub fn update<R>(
        &mut self,
        range: Option<&R>,
        tree: &ContentTree,
    ) -> Option<&LogicalSelection<H>>
    where
        R: NativeRange<Node = H>,
    {
        let range = range?;

        let (start_id, start_leaf, start_element) = self.resolve(range.start_container(), tree);
        let (end_id, end_leaf, end_element) = self.resolve(range.end_container(), tree);
        let (parent_id, _, parent_element) = self.resolve(range.common_ancestor_container(), tree);

        self.current = LogicalSelection {
            start: SelectionEndpoint {
                id: start_id,
                leaf: start_leaf,
                offset: Some(range.start_offset()),
                element: start_element,
            },
            end: SelectionEndpoint {
                id: end_id,
                leaf: end_leaf,
                offset: Some(range.end_offset()),
                element: end_element,
            },
            parent: SelectionParent {
                id: parent_id,
                element: parent_element,
            },
            native_collapsed: range.collapsed(),
        };
        let generation = self.generation.bump();
        log::debug!(
            "Selection {:?}@{:?} .. {:?}@{:?} (generation {generation})",
            self.current.start.id,
            self.current.start.offset,
            self.current.end.id,
            self.current.end.offset,
        );
        Some(&self.current)
    }

    /// Walk up from `container` to the nearest element carrying the
    /// identifying attribute and map its value to a logical node.
    fn resolve(
        &self,
        container: H,
        tree: &ContentTree,
    ) -> (Option<NodeId>, Option<usize>, Option<H>) {
        let mut candidate = Some(container);
        while let Some(node) = candidate {
            if let Some(value) = node.attribute(&self.attribute) {
                let (id, leaf) = logical_id(NodeId::new(value), tree);
                return (Some(id), leaf, Some(node));
            }
            candidate = node.parent();
        }
        (None, None, None)
    }
}

/// Map an attribute value to a node id, unpacking text-leaf ids.
///
/// A value that names a tree node wins over reading it as a leaf id, so a
/// node literally called `"x.1"` keeps its identity.
fn logical_id(value: NodeId, tree: &ContentTree) -> (NodeId, Option<usize>) {
    if tree.contains(value.as_str()) {
        return (value, None);
    }
    match value.split_leaf() {
        Some((owner, index)) if tree.contains(owner.as_str()) => (owner, Some(index)),
        _ => (value, None),
    }
}
