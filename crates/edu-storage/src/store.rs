//! Per-origin storage with per-tab handles and automatic JSON serialization.

use crate::events::{EventBus, Listener};
use crate::{MemoryBackend, StorageBackend, StorageError, StorageEvent, Subscription, TabId};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Storage shared by every tab of one origin.
#[derive(Clone)]
pub struct Origin {
    backend: Arc<dyn StorageBackend>,
    bus: Arc<EventBus>,
}

impl Origin {
    /// Create an origin over the given backend.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            bus: Arc::new(EventBus::default()),
        }
    }

    /// Create an origin over a fresh unbounded in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Open a new tab on this origin.
    pub fn open_tab(&self) -> LocalStore {
        LocalStore {
            tab: self.bus.allocate_tab(),
            origin: self.clone(),
        }
    }

    /// Deliver a change that happened outside this process to every tab.
    pub fn broadcast(&self, event: &StorageEvent) -> usize {
        self.bus.publish(event)
    }

    /// Number of live listeners across all tabs.
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
            .field("listeners", &self.bus.listener_count())
            .finish()
    }
}

/// One tab's handle onto origin storage.
///
/// Writes made through this handle notify listeners of other tabs only.
#[derive(Clone, Debug)]
pub struct LocalStore {
    tab: TabId,
    origin: Origin,
}

impl LocalStore {
    /// The tab this handle belongs to.
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Get a raw string value.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.origin.backend.get(key)
    }

    /// Set a raw string value and notify other tabs if it changed.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_value = self.origin.backend.get(key)?;
        self.origin.backend.set(key, value)?;

        if old_value.as_deref() != Some(value) {
            self.publish(key, Some(value.to_string()), old_value);
        }
        Ok(())
    }

    /// Get a value from storage.
    ///
    /// Returns `None` if the key doesn't exist and an error if the stored
    /// payload does not deserialize as `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let ids: Option<Vec<String>> = store.get("edumarket_favorites")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` as JSON and store it.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// store.set("edumarket_favorites", &["1", "2"])?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    /// Remove a value and notify other tabs if it existed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let old_value = self.origin.backend.get(key)?;
        self.origin.backend.remove(key)?;

        if old_value.is_some() {
            self.publish(key, None, old_value);
        }
        Ok(())
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// All keys in origin storage.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.origin.backend.keys()
    }

    /// Listen for changes made by other tabs.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.origin.bus.register(self.tab, listener)
    }

    /// The origin this handle belongs to.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    fn publish(&self, key: &str, new_value: Option<String>, old_value: Option<String>) {
        let event = StorageEvent {
            key: key.to_string(),
            new_value,
            old_value,
            source: self.tab,
        };
        let delivered = self.origin.bus.publish(&event);
        trace!(key, tab = %self.tab, delivered, "storage change published");
    }
}
