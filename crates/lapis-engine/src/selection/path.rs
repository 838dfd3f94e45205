//! Serializable view handles.
//!
//! Hosts whose view lives across a process or language boundary (a webview,
//! a remote UI) cannot hand out live element references. They can instead
//! capture, for each container, the identifying attribute value of the
//! container and of every ancestor up to the document root. [`AncestorPath`]
//! is that capture, and [`PathRange`] a native range built from three of them.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{NativeRange, ViewNode};

/// A view node captured as the attribute values of itself and its ancestors,
/// nearest first. `None` entries are nodes without the attribute (text nodes,
/// untagged wrappers).
///
/// Parents share the captured values, so walking up a path is linear in its
/// depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorPath {
    attribute: Rc<str>,
    values: Rc<[Option<String>]>,
    #[serde(default)]
    depth: usize,
}

impl AncestorPath {
    pub fn new(attribute: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            attribute: Rc::from(attribute.into()),
            values: values.into(),
            depth: 0,
        }
    }

    /// How many steps above the captured container this handle points
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl ViewNode for AncestorPath {
    fn attribute(&self, name: &str) -> Option<String> {
        if name != &*self.attribute {
            return None;
        }
        self.values.get(self.depth).cloned().flatten()
    }

    fn parent(&self) -> Option<Self> {
        if self.depth + 1 >= self.values.len() {
            return None;
        }
        Some(Self {
            depth: self.depth + 1,
            ..self.clone()
        })
    }
}

/// Native range over captured paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRange {
    pub start: AncestorPath,
    pub start_offset: usize,
    pub end: AncestorPath,
    pub end_offset: usize,
    pub common_ancestor: AncestorPath,
    pub collapsed: bool,
}

impl NativeRange for PathRange {
    type Node = AncestorPath;

    fn start_container(&self) -> AncestorPath {
        self.start.clone()
    }

    fn start_offset(&self) -> usize {
        self.start_offset
    }

    fn end_container(&self) -> AncestorPath {
        self.end.clone()
    }

    fn end_offset(&self) -> usize {
        self.end_offset
    }

    fn common_ancestor_container(&self) -> AncestorPath {
        self.common_ancestor.clone()
    }

    fn collapsed(&self) -> bool {
        self.collapsed
    }
}
