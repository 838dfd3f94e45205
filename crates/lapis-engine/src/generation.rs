use std::cell::Cell;
use std::rc::Rc;

/// Shared re-render counter.
///
/// The content store and selection tracker are plain cells that do not notify
/// anyone when they change. Whatever changes them bumps this counter instead,
/// and views compare the value they last rendered at against [`current`].
///
/// Clones share the same counter.
///
/// [`current`]: Generation::current
#[derive(Debug, Clone, Default)]
pub struct Generation(Rc<Cell<u64>>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.get()
    }

    /// Advance the counter and return the new value
    pub fn bump(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }
}
