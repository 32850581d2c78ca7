//! Storage change notifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Identifies one tab (store handle) within an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(u64);

impl TabId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// A change made by another tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,
    /// Serialized value after the change; `None` if the key was removed.
    pub new_value: Option<String>,
    /// Previous serialized value, if any.
    pub old_value: Option<String>,
    /// Tab that made the change.
    pub source: TabId,
}

impl StorageEvent {
    /// Build an event as if it came from an unknown peer tab.
    ///
    /// Useful for hosts that receive change notifications from outside this
    /// process and forward them to a store.
    pub fn external(key: impl Into<String>, new_value: Option<String>) -> Self {
        Self {
            key: key.into(),
            new_value,
            old_value: None,
            source: TabId(u64::MAX),
        }
    }
}

pub(crate) type Listener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

struct Entry {
    id: u64,
    tab: TabId,
    listener: Listener,
}

/// Listener registry shared by all tabs of one origin.
#[derive(Default)]
pub(crate) struct EventBus {
    entries: Mutex<Vec<Entry>>,
    next_tab: AtomicU64,
    next_listener: AtomicU64,
}

impl EventBus {
    pub(crate) fn allocate_tab(&self) -> TabId {
        TabId(self.next_tab.fetch_add(1, Ordering::SeqCst))
    }

    pub(crate) fn register(self: &Arc<Self>, tab: TabId, listener: Listener) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.lock().push(Entry { id, tab, listener });
        Subscription {
            id,
            bus: Arc::downgrade(self),
        }
    }

    /// Deliver `event` to every listener not registered by the source tab.
    ///
    /// Listeners run after the registry lock is released, so they may
    /// subscribe or write to storage themselves.
    pub(crate) fn publish(&self, event: &StorageEvent) -> usize {
        let targets: Vec<Listener> = self
            .lock()
            .iter()
            .filter(|entry| entry.tab != event.source)
            .map(|entry| Arc::clone(&entry.listener))
            .collect();
        for listener in &targets {
            listener(event);
        }
        targets.len()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn unregister(&self, id: u64) {
        self.lock().retain(|entry| entry.id != id);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    bus: Weak<EventBus>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn cancel(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unregister(self.id);
        }
    }
}
