//! Shared state views
//!
//! Several views may observe one state value. The value behind a view is
//! never modified: `copy` hands out another view of the same value and
//! `update` rebinds only the view it is called on. A view copied before an
//! update therefore keeps seeing the old value no matter in which order
//! sibling views are copied and updated.

use std::fmt;
use std::sync::Arc;

/// Handle onto an immutable state value
pub struct StateView<V> {
    value: Arc<V>,
    generation: u64,
}

impl<V> StateView<V> {
    pub fn new(value: V) -> Self {
        Self {
            value: Arc::new(value),
            generation: 0,
        }
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    /// Another view of the current value
    pub fn copy(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            generation: self.generation,
        }
    }

    /// Bind this view to a new value. Other views are unaffected.
    pub fn update(&mut self, value: V) {
        self.value = Arc::new(value);
        self.generation += 1;
    }

    /// Bind this view to a value derived from the current one
    pub fn modify<F>(&mut self, f: F)
    where
        F: FnOnce(&V) -> V,
    {
        let next = f(&self.value);
        self.update(next);
    }

    /// Number of updates applied along this view's history
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if both views currently observe the same value
    pub fn shares_value_with(&self, other: &StateView<V>) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl<V> Clone for StateView<V> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<V: fmt::Debug> fmt::Debug for StateView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateView")
            .field("value", &self.value)
            .field("generation", &self.generation)
            .finish()
    }
}
