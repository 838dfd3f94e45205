//! # Key Event Routing
//!
//! The native view must never apply its own text edits: the content store is
//! the single source of truth. Every key event reaching the editor root has
//! its default action suppressed and propagation stopped, then goes to the
//! host's transform callback. A returned tree replaces the content; anything
//! else is a no-op.

use std::cell::RefCell;

use crate::content::ContentTree;
use crate::selection::LogicalSelection;
use crate::store::ContentStore;

/// Key event as delivered by the host
pub trait KeyEvent {
    fn prevent_default(&self);
    fn stop_propagation(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Host transform: may return a whole new tree to install
pub type TransformFn<E, H> =
    Box<dyn Fn(&E, &ContentTree, &LogicalSelection<H>) -> Option<ContentTree>>;

/// Hands key events to host transforms and applies their result
pub struct EventRouter<E, H> {
    on_key_down: Option<TransformFn<E, H>>,
    on_key_up: Option<TransformFn<E, H>>,
}

impl<E, H> Default for EventRouter<E, H> {
    fn default() -> Self {
        Self {
            on_key_down: None,
            on_key_up: None,
        }
    }
}

impl<E: KeyEvent, H> EventRouter<E, H> {
    pub fn new(
        on_key_down: Option<TransformFn<E, H>>,
        on_key_up: Option<TransformFn<E, H>>,
    ) -> Self {
        Self {
            on_key_down,
            on_key_up,
        }
    }

    /// Suppress the native action for `event` and run the matching transform.
    ///
    /// Returns the tree to install, if the transform produced a usable one.
    /// An empty tree counts as "no change".
    pub fn route(
        &self,
        phase: KeyPhase,
        event: &E,
        content: &ContentTree,
        selection: &LogicalSelection<H>,
    ) -> Option<ContentTree> {
        event.prevent_default();
        event.stop_propagation();

        let transform = match phase {
            KeyPhase::Down => self.on_key_down.as_ref(),
            KeyPhase::Up => self.on_key_up.as_ref(),
        }?;

        match transform(event, content, selection) {
            Some(tree) if tree.is_empty() => {
                log::debug!("Key {phase:?} transform returned an empty tree; ignoring");
                None
            }
            result => result,
        }
    }

    /// Route `event` and install whatever the transform returns into `store`.
    ///
    /// The store is only borrowed for the snapshot and for the final swap, so
    /// the transform itself may read the store. Returns the new generation
    /// when content was replaced.
    pub fn dispatch(
        &self,
        phase: KeyPhase,
        event: &E,
        store: &RefCell<ContentStore>,
        selection: &LogicalSelection<H>,
    ) -> Option<u64> {
        let content = store.borrow().get();
        let tree = self.route(phase, event, &content, selection)?;
        store.borrow_mut().replace(tree).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentNode, NodeId, Validation};
    use crate::generation::Generation;
    use crate::selection::AncestorPath;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeKey {
        prevented: Cell<bool>,
        stopped: Cell<bool>,
    }

    impl KeyEvent for FakeKey {
        fn prevent_default(&self) {
            self.prevented.set(true);
        }

        fn stop_propagation(&self) {
            self.stopped.set(true);
        }
    }

    type Router = EventRouter<FakeKey, AncestorPath>;

    fn transform(
        f: impl Fn(&FakeKey, &ContentTree, &LogicalSelection<AncestorPath>) -> Option<ContentTree>
        + 'static,
    ) -> Option<TransformFn<FakeKey, AncestorPath>> {
        Some(Box::new(f))
    }

    fn press(router: &Router, phase: KeyPhase, store: &RefCell<ContentStore>) -> Option<u64> {
        router.dispatch(phase, &FakeKey::default(), store, &LogicalSelection::default())
    }

    fn store() -> (RefCell<ContentStore>, Generation) {
        let generation = Generation::new();
        let tree = ContentTree::from_nodes([ContentNode::new("root", "root")]);
        let store = ContentStore::new(
            NodeId::new("root"),
            tree,
            Validation::Lenient,
            generation.clone(),
        );
        (RefCell::new(store), generation)
    }

    fn replacement() -> ContentTree {
        ContentTree::from_nodes([
            ContentNode::new("root", "root").with_node("p"),
            ContentNode::new("p", "text").with_text("typed"),
        ])
    }

    #[test]
    fn test_default_action_is_always_suppressed() {
        let router = Router::default();
        let event = FakeKey::default();

        let result = router.route(
            KeyPhase::Down,
            &event,
            &ContentTree::new(),
            &LogicalSelection::default(),
        );

        assert!(result.is_none());
        assert!(event.prevented.get());
        assert!(event.stopped.get());
    }

    #[test]
    fn test_returned_tree_is_installed() {
        let router = Router::new(transform(|_, _, _| Some(replacement())), None);
        let (store, generation) = store();

        assert_eq!(press(&router, KeyPhase::Down, &store), Some(1));
        assert_eq!(*store.borrow().get(), replacement());
        assert_eq!(generation.current(), 1);
    }

    #[test]
    fn test_none_leaves_store_untouched() {
        let router = Router::new(transform(|_, _, _| None), transform(|_, _, _| None));
        let (store, generation) = store();
        let before = store.borrow().get();

        for phase in [KeyPhase::Down, KeyPhase::Up] {
            assert_eq!(press(&router, phase, &store), None);
        }

        assert_eq!(store.borrow().get(), before);
        assert_eq!(generation.current(), 0);
    }

    #[test]
    fn test_empty_tree_counts_as_no_change() {
        let router = Router::new(transform(|_, _, _| Some(ContentTree::new())), None);
        let (store, generation) = store();

        assert_eq!(press(&router, KeyPhase::Down, &store), None);
        assert_eq!(generation.current(), 0);
    }

    #[test]
    fn test_phases_use_their_own_transform() {
        let router = Router::new(None, transform(|_, _, _| Some(replacement())));
        let (store, _) = store();

        assert_eq!(press(&router, KeyPhase::Down, &store), None);
        assert_eq!(press(&router, KeyPhase::Up, &store), Some(1));
    }

    #[test]
    fn test_transform_may_read_the_store() {
        let (store, _) = store();
        let store = std::rc::Rc::new(store);
        let reader = std::rc::Rc::clone(&store);
        let router = Router::new(
            transform(move |_, content, _| {
                // Re-entrant read while routing
                assert_eq!(reader.borrow().get().len(), content.len());
                Some(replacement())
            }),
            None,
        );

        assert_eq!(press(&router, KeyPhase::Down, &store), Some(1));
    }

    #[test]
    fn test_cyclic_result_is_rejected() {
        let router = Router::new(
            transform(|_, _, _| {
                Some(ContentTree::from_nodes([ContentNode::new("root", "root").with_node("root")]))
            }),
            None,
        );
        let (store, generation) = store();

        assert_eq!(press(&router, KeyPhase::Down, &store), None);
        assert_eq!(generation.current(), 0);
    }
}
