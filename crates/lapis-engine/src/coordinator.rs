//! # Coordinator
//!
//! Wires the content store, render bridge, selection tracker and event router
//! together and exposes the two calls an embedding view needs:
//!
//! - [`Coordinator::get_container_props`]: the identifying root attribute plus
//!   key handlers, to spread onto the editor's root element.
//! - [`Coordinator::get_content`]: the rendered content, to place inside it.
//!
//! Neither the store nor the tracker trigger re-renders on their own. Both
//! bump a shared [`Generation`] counter instead; views re-read content and
//! selection whenever [`Coordinator::generation`] moves.
//!
//! The coordinator subscribes to the selection source exactly once, when it is
//! mounted, and unsubscribes on [`teardown`](Coordinator::teardown) or drop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::DEFAULT_ATTRIBUTE_NAME;
use crate::content::{ContentError, ContentTree, NodeId, Validation};
use crate::events::{EventRouter, KeyEvent, KeyPhase, TransformFn};
use crate::generation::Generation;
use crate::render::{RenderBridge, RendererRegistry};
use crate::selection::{
    ListenerId, LogicalSelection, SelectionSource, SelectionTracker, ViewHandle,
};
use crate::store::ContentStore;

/// Embedder configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorOptions {
    /// Attribute carrying node ids on rendered elements
    pub attribute_name: String,
    pub root_id: NodeId,
    /// Installed unchecked at mount; an empty tree when absent
    pub default_content: Option<ContentTree>,
    pub validation: Validation,
}

impl CoordinatorOptions {
    pub fn new(root_id: impl Into<NodeId>) -> Self {
        Self {
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            root_id: root_id.into(),
            default_content: None,
            validation: Validation::default(),
        }
    }

    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    pub fn with_default_content(mut self, content: ContentTree) -> Self {
        self.default_content = Some(content);
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }
}

/// Read-only observer fired after every selection recomputation
pub type SelectionCallback<H> = Box<dyn Fn(&ContentTree, &LogicalSelection<H>)>;

/// Host callbacks, all optional
pub struct HostCallbacks<E, H> {
    on_key_down: Option<TransformFn<E, H>>,
    on_key_up: Option<TransformFn<E, H>>,
    on_selection: Option<SelectionCallback<H>>,
}

impl<E, H> Default for HostCallbacks<E, H> {
    fn default() -> Self {
        Self {
            on_key_down: None,
            on_key_up: None,
            on_selection: None,
        }
    }
}

impl<E, H> HostCallbacks<E, H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(
        mut self,
        transform: impl Fn(&E, &ContentTree, &LogicalSelection<H>) -> Option<ContentTree> + 'static,
    ) -> Self {
        self.on_key_down = Some(Box::new(transform));
        self
    }

    pub fn on_key_up(
        mut self,
        transform: impl Fn(&E, &ContentTree, &LogicalSelection<H>) -> Option<ContentTree> + 'static,
    ) -> Self {
        self.on_key_up = Some(Box::new(transform));
        self
    }

    pub fn on_selection(
        mut self,
        observer: impl Fn(&ContentTree, &LogicalSelection<H>) + 'static,
    ) -> Self {
        self.on_selection = Some(Box::new(observer));
        self
    }
}

/// Key handler handed to the view
pub type KeyHandler<E> = Rc<dyn Fn(&E)>;

/// Props for the editor's root element
pub struct ContainerProps<E> {
    /// Name of the identifying attribute
    pub attribute: String,
    /// Value of the identifying attribute on the root element
    pub root_id: NodeId,
    pub on_key_down: KeyHandler<E>,
    pub on_key_up: KeyHandler<E>,
}

impl<E> Clone for ContainerProps<E> {
    fn clone(&self) -> Self {
        Self {
            attribute: self.attribute.clone(),
            root_id: self.root_id.clone(),
            on_key_down: Rc::clone(&self.on_key_down),
            on_key_up: Rc::clone(&self.on_key_up),
        }
    }
}

struct Shared<O, S: SelectionSource, E> {
    attribute: String,
    generation: Generation,
    store: RefCell<ContentStore>,
    tracker: RefCell<SelectionTracker<ViewHandle<S>>>,
    router: EventRouter<E, ViewHandle<S>>,
    on_selection: Option<SelectionCallback<ViewHandle<S>>>,
    registry: RendererRegistry<O>,
    source: S,
}

impl<O, S: SelectionSource, E: KeyEvent> Shared<O, S, E> {
    fn on_selection_change(&self) {
        let Some(range) = self.source.active_range() else {
            log::trace!("Selection changed with no active range; keeping previous snapshot");
            return;
        };
        let content = self.store.borrow().get();
        let selection = self
            .tracker
            .borrow_mut()
            .update(Some(&range), &content)
            .cloned();

        // No borrows are held while the host observes
        if let (Some(selection), Some(observer)) = (selection, &self.on_selection) {
            observer(&content, &selection);
        }
    }

    fn handle_key(&self, phase: KeyPhase, event: &E) -> Option<u64> {
        let selection = self.tracker.borrow().current().clone();
        self.router.dispatch(phase, event, &self.store, &selection)
    }
}

/// The editor core, generic over host output `O`, selection source `S` and
/// key event type `E`.
pub struct Coordinator<O, S: SelectionSource, E> {
    shared: Rc<Shared<O, S, E>>,
    subscription: Cell<Option<ListenerId>>,
}

impl<O, S, E> Coordinator<O, S, E>
where
    O: 'static,
    S: SelectionSource + 'static,
    E: KeyEvent + 'static,
{
    /// Build the core and subscribe to `source`
    pub fn mount(
        options: CoordinatorOptions,
        registry: RendererRegistry<O>,
        callbacks: HostCallbacks<E, ViewHandle<S>>,
        source: S,
    ) -> Self {
        let generation = Generation::new();
        let store = ContentStore::new(
            options.root_id.clone(),
            options.default_content.unwrap_or_default(),
            options.validation,
            generation.clone(),
        );
        let tracker = SelectionTracker::new(options.attribute_name.clone(), generation.clone());

        let shared = Rc::new(Shared {
            attribute: options.attribute_name,
            generation,
            store: RefCell::new(store),
            tracker: RefCell::new(tracker),
            router: EventRouter::new(callbacks.on_key_down, callbacks.on_key_up),
            on_selection: callbacks.on_selection,
            registry,
            source,
        });

        let weak = Rc::downgrade(&shared);
        let subscription = shared.source.subscribe(Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_selection_change();
            }
        }));

        log::debug!(
            "Mounted editor rooted at `{}` ({} nodes)",
            options.root_id,
            shared.store.borrow().get().len()
        );

        Self {
            shared,
            subscription: Cell::new(Some(subscription)),
        }
    }

    /// Stop listening for selection changes. Idempotent.
    pub fn teardown(&self) {
        if let Some(id) = self.subscription.take() {
            self.shared.source.unsubscribe(id);
            log::debug!("Unsubscribed editor from selection changes");
        }
    }

    pub fn is_mounted(&self) -> bool {
        let id = self.subscription.take();
        self.subscription.set(id);
        id.is_some()
    }

    /// Re-render counter; changes whenever content or selection do
    pub fn generation(&self) -> u64 {
        self.shared.generation.current()
    }

    /// Shared handle on the counter, for views that poll it
    pub fn generation_handle(&self) -> Generation {
        self.shared.generation.clone()
    }

    pub fn root_id(&self) -> NodeId {
        self.shared.store.borrow().root_id().clone()
    }

    pub fn attribute_name(&self) -> &str {
        &self.shared.attribute
    }

    /// Current content snapshot
    pub fn content(&self) -> Arc<ContentTree> {
        self.shared.store.borrow().get()
    }

    /// Latest selection snapshot
    pub fn selection(&self) -> LogicalSelection<ViewHandle<S>> {
        self.shared.tracker.borrow().current().clone()
    }

    /// Render the current content. The root is transparent, so this is the
    /// list of its children's slots.
    pub fn get_content(&self) -> Vec<Option<O>> {
        let content = self.content();
        let root_id = self.root_id();
        RenderBridge::new(
            &content,
            &root_id,
            &self.shared.attribute,
            &self.shared.registry,
        )
        .render(&root_id)
    }

    pub fn get_container_props(&self) -> ContainerProps<E> {
        ContainerProps {
            attribute: self.shared.attribute.clone(),
            root_id: self.root_id(),
            on_key_down: key_handler(Rc::downgrade(&self.shared), KeyPhase::Down),
            on_key_up: key_handler(Rc::downgrade(&self.shared), KeyPhase::Up),
        }
    }

    /// Route a key event as the container props' handlers do.
    ///
    /// Returns the new generation if the host transform replaced the content.
    pub fn handle_key(&self, phase: KeyPhase, event: &E) -> Option<u64> {
        self.shared.handle_key(phase, event)
    }

    /// Install content outside of a key handler, e.g. after loading a file
    pub fn replace_content(&self, tree: ContentTree) -> Result<u64, ContentError> {
        self.shared.store.borrow_mut().replace(tree)
    }
}

impl<O, S: SelectionSource, E> Drop for Coordinator<O, S, E> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.shared.source.unsubscribe(id);
        }
    }
}

fn key_handler<O, S, E>(shared: Weak<Shared<O, S, E>>, phase: KeyPhase) -> KeyHandler<E>
where
    O: 'static,
    S: SelectionSource + 'static,
    E: KeyEvent + 'static,
{
    Rc::new(move |event: &E| match shared.upgrade() {
        Some(shared) => {
            shared.handle_key(phase, event);
        }
        None => log::trace!("Key {phase:?} after the editor was dropped"),
    })
}
