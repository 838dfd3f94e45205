use std::sync::Arc;

use crate::content::{ContentError, ContentTree, NodeId, Validation};
use crate::generation::Generation;

/// Owner of the canonical content tree.
///
/// The tree is held behind an `Arc` and only ever swapped as a whole, so a
/// reader holding the result of [`get`](ContentStore::get) keeps a complete
/// snapshot no matter what is installed afterwards.
#[derive(Debug)]
pub struct ContentStore {
    root_id: NodeId,
    tree: Arc<ContentTree>,
    validation: Validation,
    generation: Generation,
}

impl ContentStore {
    /// Store seeded with `initial`, installed without checks.
    ///
    /// Every accepted [`replace`](ContentStore::replace) bumps `generation`.
    pub fn new(
        root_id: NodeId,
        initial: ContentTree,
        validation: Validation,
        generation: Generation,
    ) -> Self {
        Self {
            root_id,
            tree: Arc::new(initial),
            validation,
            generation,
        }
    }

    /// Current tree snapshot
    pub fn get(&self) -> Arc<ContentTree> {
        Arc::clone(&self.tree)
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    /// Install `tree` in place of the current one.
    ///
    /// A tree that loops back on itself below the root is always refused; in
    /// strict mode any structural problem is. A refused tree leaves both the
    /// store and the generation counter untouched.
    pub fn replace(&mut self, tree: ContentTree) -> Result<u64, ContentError> {
        if let Err(e) = tree.check(self.root_id.as_str(), self.validation) {
            log::warn!("Rejected content replacement: {e}");
            return Err(e);
        }
        self.tree = Arc::new(tree);
        let generation = self.generation.bump();
        log::debug!(
            "Installed content tree with {} nodes (generation {generation})",
            self.tree.len()
        );
        Ok(generation)
    }
}
