//! # Content Tree Model
//!
//! The editable structure is a flat map of [`NodeId`] → [`ContentNode`]. Nodes
//! reference each other by id through [`ChildRef::Node`]; literal text lives
//! inline as [`ChildRef::Text`]. One id is designated as the root when the
//! tree is handed to a [`ContentStore`](crate::ContentStore).
//!
//! The model itself never enforces structure. [`ContentTree::validate`] and
//! [`ContentTree::find_cycle`] are the checks callers opt into.

pub mod markdown;

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Logical identifier of a content node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for nodes created by host transforms
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Synthetic id of the text leaf at `index` within this node: `"<id>.<index>"`
    pub fn leaf(&self, index: usize) -> NodeId {
        NodeId(format!("{}.{}", self.0, index))
    }

    /// Split a synthetic leaf id back into its owner and child index.
    ///
    /// Only the shape is checked here; whether the owner exists is up to the caller.
    pub fn split_leaf(&self) -> Option<(NodeId, usize)> {
        let (owner, index) = self.0.rsplit_once('.')?;
        if owner.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index = index.parse().ok()?;
        Some((NodeId::new(owner), index))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Open-ended node type tag interpreted by the host renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for TypeTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Borrow<str> for TypeTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A child slot of a content node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ChildRef {
    /// Literal text rendered as a leaf
    Text(String),
    /// Reference to another node in the same tree
    Node(NodeId),
}

impl ChildRef {
    pub fn text(value: impl Into<String>) -> Self {
        ChildRef::Text(value.into())
    }

    pub fn node(id: impl Into<NodeId>) -> Self {
        ChildRef::Node(id.into())
    }
}

/// A logical node in the content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: TypeTag,
    #[serde(default)]
    pub children: Option<Vec<ChildRef>>,
}

impl ContentNode {
    /// Node without a children list
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<TypeTag>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            children: None,
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ChildRef>) -> Self {
        self.children
            .get_or_insert_with(Vec::new)
            .extend(children);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_children([ChildRef::text(text)])
    }

    pub fn with_node(self, id: impl Into<NodeId>) -> Self {
        self.with_children([ChildRef::node(id)])
    }

    /// Children as a slice; a missing list reads as empty
    pub fn child_refs(&self) -> &[ChildRef] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Problems found when checking a tree's structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("root node `{0}` is not present in the content tree")]
    MissingRoot(NodeId),

    #[error("node stored under `{key}` declares id `{id}`")]
    IdMismatch { key: NodeId, id: NodeId },

    #[error("node `{parent}` references missing node `{child}`")]
    DanglingReference { parent: NodeId, child: NodeId },

    #[error("node `{0}` is reachable from itself")]
    Cycle(NodeId),
}

/// How much checking a replacement goes through before it is installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Only cycles reachable from the root are rejected; everything else
    /// renders as empty slots.
    #[default]
    Lenient,
    /// Any problem reported by [`ContentTree::validate`] rejects the tree.
    Strict,
}

/// Mapping of node ids to nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTree {
    nodes: HashMap<NodeId, ContentNode>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree keyed by each node's own id
    pub fn from_nodes(nodes: impl IntoIterator<Item = ContentNode>) -> Self {
        let mut tree = Self::new();
        for node in nodes {
            tree.insert(node);
        }
        tree
    }

    /// Insert a node under its own id, returning the node it replaced
    pub fn insert(&mut self, node: ContentNode) -> Option<ContentNode> {
        self.nodes.insert(node.id.clone(), node)
    }

    pub fn remove(&mut self, id: &str) -> Option<ContentNode> {
        self.nodes.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ContentNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.values()
    }

    /// Node ids in sorted order
    pub fn sorted_ids(&self) -> Vec<&NodeId> {
        let mut ids: Vec<_> = self.nodes.keys().collect();
        ids.sort();
        ids
    }

    /// Concatenated text of a node and everything below it.
    ///
    /// Missing references contribute nothing and a node already on the
    /// current path is not entered twice.
    pub fn text_of(&self, id: &str) -> String {
        let mut out = String::new();
        let Some((key, node)) = self.nodes.get_key_value(id) else {
            return out;
        };
        let mut on_path: HashSet<&NodeId> = HashSet::from([key]);
        let mut stack = vec![(key, node.child_refs().iter())];

        while let Some((current, children)) = stack.last_mut() {
            match children.next() {
                Some(ChildRef::Text(text)) => out.push_str(text),
                Some(ChildRef::Node(child)) => {
                    if let Some((child_key, child_node)) = self.nodes.get_key_value(child)
                        && on_path.insert(child_key)
                    {
                        stack.push((child_key, child_node.child_refs().iter()));
                    }
                }
                None => {
                    let current: &NodeId = *current;
                    on_path.remove(current);
                    stack.pop();
                }
            }
        }
        out
    }

    /// First node found to be its own ancestor when walking down from `root`
    pub fn find_cycle(&self, root: &str) -> Option<NodeId> {
        let (root_key, root_node) = self.nodes.get_key_value(root)?;
        let mut on_path: HashSet<&NodeId> = HashSet::from([root_key]);
        let mut finished: HashSet<&NodeId> = HashSet::new();
        let mut stack = vec![(root_key, root_node.child_refs().iter())];

        loop {
            let Some((current, children)) = stack.last_mut() else {
                break;
            };
            let current: &NodeId = *current;
            match children.next() {
                Some(ChildRef::Node(child)) => {
                    let Some((child_key, child_node)) = self.nodes.get_key_value(child) else {
                        continue;
                    };
                    if on_path.contains(child_key) {
                        return Some(child_key.clone());
                    }
                    if finished.contains(child_key) {
                        continue;
                    }
                    on_path.insert(child_key);
                    stack.push((child_key, child_node.child_refs().iter()));
                }
                Some(ChildRef::Text(_)) => {}
                None => {
                    on_path.remove(current);
                    finished.insert(current);
                    stack.pop();
                }
            }
        }
        None
    }

    /// Full structural check: root present, keys match ids, every reference
    /// resolves and nothing below the root loops back on itself.
    pub fn validate(&self, root: &str) -> Result<(), ContentError> {
        if !self.contains(root) {
            return Err(ContentError::MissingRoot(NodeId::new(root)));
        }
        for key in self.sorted_ids() {
            let node = &self.nodes[key];
            if &node.id != key {
                return Err(ContentError::IdMismatch {
                    key: key.clone(),
                    id: node.id.clone(),
                });
            }
            for child in node.child_refs() {
                if let ChildRef::Node(child) = child
                    && !self.contains(child.as_str())
                {
                    return Err(ContentError::DanglingReference {
                        parent: key.clone(),
                        child: child.clone(),
                    });
                }
            }
        }
        match self.find_cycle(root) {
            Some(id) => Err(ContentError::Cycle(id)),
            None => Ok(()),
        }
    }

    /// Apply the checks selected by `validation`
    pub fn check(&self, root: &str, validation: Validation) -> Result<(), ContentError> {
        match validation {
            Validation::Strict => self.validate(root),
            Validation::Lenient => match self.find_cycle(root) {
                Some(id) => Err(ContentError::Cycle(id)),
                None => Ok(()),
            },
        }
    }
}

impl FromIterator<ContentNode> for ContentTree {
    fn from_iter<I: IntoIterator<Item = ContentNode>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sample_tree() -> ContentTree {
        ContentTree::from_nodes([
            ContentNode::new("root", "root").with_node("a").with_node("b"),
            ContentNode::new("a", "header").with_text("Hi"),
            ContentNode::new("b", "text").with_text("Bye ").with_node("c"),
            ContentNode::new("c", "italic").with_text("now"),
        ])
    }

    #[test]
    fn test_child_ref_serializes_with_kind_and_value() {
        let serialized =
            toml::to_string(&ContentNode::new("a", "header").with_text("Hi")).unwrap();
        let node: ContentNode = toml::from_str(&serialized).unwrap();

        assert_eq!(node.child_refs(), &[ChildRef::text("Hi")]);
        assert!(serialized.contains("kind = \"text\""));
        assert!(serialized.contains("type = \"header\""));
    }

    #[test]
    fn test_missing_children_reads_as_empty() {
        let node = ContentNode::new("x", "rule");
        assert!(node.children.is_none());
        assert!(node.child_refs().is_empty());
    }

    #[rstest]
    #[case("a.0", Some(("a", 0)))]
    #[case("quas.12", Some(("quas", 12)))]
    #[case("v1.2.3", Some(("v1.2", 3)))]
    #[case("a", None)]
    #[case("a.", None)]
    #[case(".3", None)]
    #[case("a.b", None)]
    fn test_split_leaf(#[case] raw: &str, #[case] expected: Option<(&str, usize)>) {
        let split = NodeId::new(raw).split_leaf();
        assert_eq!(
            split,
            expected.map(|(owner, index)| (NodeId::new(owner), index))
        );
    }

    #[test]
    fn test_leaf_id_round_trips_through_split() {
        let leaf = NodeId::new("wex").leaf(1);
        assert_eq!(leaf.as_str(), "wex.1");
        assert_eq!(leaf.split_leaf(), Some((NodeId::new("wex"), 1)));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(NodeId::generate(), NodeId::generate());
    }

    #[test]
    fn test_text_of_concatenates_descendants() {
        let tree = sample_tree();
        assert_eq!(tree.text_of("b"), "Bye now");
        assert_eq!(tree.text_of("root"), "HiBye now");
        assert_eq!(tree.text_of("missing"), "");
    }

    #[test]
    fn test_text_of_deep_chain() {
        let depth = 120_000;
        let mut tree = ContentTree::from_nodes((0..depth).map(|level| {
            let node = ContentNode::new(format!("n{level}"), "span").with_text("x");
            if level + 1 == depth {
                node
            } else {
                node.with_node(format!("n{}", level + 1))
            }
        }));
        tree.insert(ContentNode::new("root", "root").with_node("n0"));

        assert_eq!(tree.validate("root"), Ok(()));
        assert_eq!(tree.text_of("root").len(), depth);
    }

    #[test]
    fn test_text_of_skips_repeat_on_path() {
        let tree = ContentTree::from_nodes([
            ContentNode::new("a", "span").with_text("a").with_node("b"),
            ContentNode::new("b", "span").with_text("b").with_node("a"),
        ]);
        assert_eq!(tree.text_of("a"), "ab");
    }

    #[test]
    fn test_valid_tree_passes_validation() {
        assert_eq!(sample_tree().validate("root"), Ok(()));
    }

    #[test]
    fn test_validate_reports_missing_root() {
        assert_eq!(
            sample_tree().validate("nope"),
            Err(ContentError::MissingRoot(NodeId::new("nope")))
        );
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let mut tree = sample_tree();
        tree.insert(ContentNode::new("a", "header").with_node("missing"));

        assert_eq!(
            tree.validate("root"),
            Err(ContentError::DanglingReference {
                parent: NodeId::new("a"),
                child: NodeId::new("missing"),
            })
        );
        // Lenient checks let unresolved references through
        assert_eq!(tree.check("root", Validation::Lenient), Ok(()));
    }

    #[test]
    fn test_validate_reports_id_mismatch() {
        let mut tree = sample_tree();
        tree.nodes
            .insert(NodeId::new("a"), ContentNode::new("other", "text"));

        assert_eq!(
            tree.validate("root"),
            Err(ContentError::IdMismatch {
                key: NodeId::new("a"),
                id: NodeId::new("other"),
            })
        );
    }

    /// Parses `"root:a b;a:c;c:"` into nodes with node-only children
    fn tree_from_shape(shape: &str) -> ContentTree {
        shape
            .split(';')
            .map(|entry| {
                let (id, children) = entry.split_once(':').unwrap();
                ContentNode::new(id, "span")
                    .with_children(children.split_whitespace().map(ChildRef::node))
            })
            .collect()
    }

    #[rstest]
    #[case::self_reference("root:root", Some("root"))]
    #[case::two_node_loop("root:a;a:b;b:a", Some("a"))]
    #[case::diamond_is_not_a_cycle("root:a b;a:c;b:c;c:", None)]
    #[case::dangling_is_not_a_cycle("root:ghost", None)]
    fn test_find_cycle(#[case] shape: &str, #[case] expected: Option<&str>) {
        let tree = tree_from_shape(shape);
        assert_eq!(tree.find_cycle("root"), expected.map(NodeId::new));
    }

    #[test]
    fn test_cycle_unreachable_from_root_is_ignored() {
        let mut tree = sample_tree();
        tree.insert(ContentNode::new("x", "span").with_node("y"));
        tree.insert(ContentNode::new("y", "span").with_node("x"));

        assert_eq!(tree.find_cycle("root"), None);
        assert_eq!(tree.check("root", Validation::Strict), Ok(()));
    }

    #[test]
    fn test_text_of_stops_at_cycles() {
        let tree = ContentTree::from_nodes([
            ContentNode::new("a", "span").with_text("x").with_node("b"),
            ContentNode::new("b", "span").with_text("y").with_node("a"),
        ]);
        assert_eq!(tree.text_of("a"), "xy");
    }
}
