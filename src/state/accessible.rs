//! Readable, clonable, persistable state

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;

/// External persistence hook, called with a caller-chosen base name
pub trait SaveHook<V>: Send + Sync {
    fn save(&self, base_name: &str, state: &V) -> Result<()>;
}

/// Hook that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSave;

impl<V> SaveHook<V> for NoSave {
    fn save(&self, _base_name: &str, _state: &V) -> Result<()> {
        Ok(())
    }
}

type CopyFn<V> = Arc<dyn Fn(&V) -> V + Send + Sync>;

/// State value owned by one strategy instance.
///
/// Cloning goes through the caller-supplied copy function, so a clone
/// never aliases the original. The save hook is shared between clones.
pub struct AccessibleState<V> {
    value: V,
    copy: CopyFn<V>,
    hook: Arc<dyn SaveHook<V>>,
}

impl<V> AccessibleState<V> {
    /// Create a state with an explicit deep-copy function
    pub fn new<C>(value: V, copy: C, hook: Arc<dyn SaveHook<V>>) -> Self
    where
        C: Fn(&V) -> V + Send + Sync + 'static,
    {
        Self {
            value,
            copy: Arc::new(copy),
            hook,
        }
    }

    /// Independent copy of the current value
    pub fn get(&self) -> V {
        (self.copy)(&self.value)
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn set(&mut self, value: V) {
        self.value = value;
    }

    /// Same copy function and hook, different value
    pub fn with_value(&self, value: V) -> Self {
        Self {
            value,
            copy: Arc::clone(&self.copy),
            hook: Arc::clone(&self.hook),
        }
    }

    /// Persist the current value through the save hook
    pub fn save(&self, base_name: &str) -> Result<()> {
        debug!(base_name, "saving strategy state");
        self.hook.save(base_name, &self.value)
    }
}

impl<V: Clone + 'static> AccessibleState<V> {
    /// Create a state whose copies use `V::clone`
    pub fn cloned(value: V, hook: Arc<dyn SaveHook<V>>) -> Self {
        Self::new(value, V::clone, hook)
    }
}

impl<V> Clone for AccessibleState<V> {
    fn clone(&self) -> Self {
        self.with_value(self.get())
    }
}

impl<V: fmt::Debug> fmt::Debug for AccessibleState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessibleState")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
