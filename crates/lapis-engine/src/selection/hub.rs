use std::cell::RefCell;
use std::rc::Rc;

use super::{ListenerId, NativeRange, SelectionListener, SelectionSource};

struct HubState<R> {
    range: Option<R>,
    listeners: Vec<(ListenerId, SelectionListener)>,
    next_id: u64,
}

/// Single-threaded selection-change source that hosts push native ranges into.
///
/// The host calls [`notify`](SelectionHub::notify) from its own
/// selection-changed hook; every subscriber is then invoked in subscription
/// order and reads the range back through
/// [`active_range`](SelectionSource::active_range). Clones share state.
pub struct SelectionHub<R> {
    state: Rc<RefCell<HubState<R>>>,
}

impl<R> Clone for SelectionHub<R> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<R> Default for SelectionHub<R> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(HubState {
                range: None,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }
}

impl<R> std::fmt::Debug for SelectionHub<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SelectionHub")
            .field("has_range", &state.range.is_some())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl<R> SelectionHub<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the active range (or its absence) and fire every listener
    pub fn notify(&self, range: Option<R>) {
        let listeners: Vec<SelectionListener> = {
            let mut state = self.state.borrow_mut();
            state.range = range;
            state
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };
        // Listeners may read the hub or unsubscribe while running
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl<R: NativeRange + Clone> SelectionSource for SelectionHub<R> {
    type Range = R;

    fn active_range(&self) -> Option<R> {
        self.state.borrow().range.clone()
    }

    fn subscribe(&self, listener: SelectionListener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() != before
    }
}
