//! State mirrored to one durable storage key and kept in sync across tabs.

use edu_storage::{LocalStore, StorageEvent, Subscription};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, warn};

type Normalize<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Where the latest change to a synced value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Loaded from storage at startup.
    Hydrated,
    /// Mutated through this tab.
    Local,
    /// Replaced by another tab's write.
    Remote,
}

/// A value together with the origin of its latest change.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub value: T,
    pub origin: ChangeOrigin,
}

/// In-memory state persisted under one key.
///
/// Every local mutation writes the whole value back synchronously. A change
/// to the same key from another tab replaces the in-memory value entirely;
/// there is no merge.
pub(crate) struct SyncedState<T> {
    label: &'static str,
    key: String,
    storage: LocalStore,
    state: Arc<watch::Sender<Synced<T>>>,
    normalize: Normalize<T>,
    _subscription: Subscription,
}

impl<T> SyncedState<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static,
{
    /// Hydrate from storage and start listening for remote changes.
    ///
    /// A missing key yields the default value. A malformed payload is logged
    /// and also yields the default value.
    pub(crate) fn open(
        label: &'static str,
        storage: LocalStore,
        key: impl Into<String>,
        normalize: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> Self {
        let key = key.into();
        let normalize: Normalize<T> = Arc::new(normalize);

        let initial = match storage.get::<T>(&key) {
            Ok(Some(value)) => normalize(value),
            Ok(None) => T::default(),
            Err(e) => {
                warn!(store = label, key = %key, error = %e, "discarding unreadable persisted state");
                T::default()
            }
        };

        let (sender, _) = watch::channel(Synced {
            value: initial,
            origin: ChangeOrigin::Hydrated,
        });
        let state = Arc::new(sender);

        let subscription = {
            let state = Arc::clone(&state);
            let normalize = Arc::clone(&normalize);
            let key = key.clone();
            storage.subscribe(move |event| {
                if event.key == key {
                    apply_remote(label, &state, &normalize, event);
                }
            })
        };

        debug!(store = label, key = %key, tab = %storage.tab(), "store hydrated");

        Self {
            label,
            key,
            storage,
            state,
            normalize,
            _subscription: subscription,
        }
    }

    /// Storage key this state is persisted under.
    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Read the current value.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.borrow().value)
    }

    /// Clone the current value.
    pub(crate) fn snapshot(&self) -> T {
        self.read(T::clone)
    }

    /// Mutate, then persist the full result.
    ///
    /// Persistence failures are logged; the in-memory value is updated either
    /// way.
    pub(crate) fn update<R: Default>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut result = R::default();
        let mut snapshot = None;
        self.state.send_modify(|synced| {
            result = f(&mut synced.value);
            synced.origin = ChangeOrigin::Local;
            snapshot = Some(synced.value.clone());
        });

        if let Some(snapshot) = snapshot {
            if let Err(e) = self.storage.set(&self.key, &snapshot) {
                error!(store = self.label, key = %self.key, error = %e, "failed to persist state");
            }
        }
        result
    }

    /// Handle a change notification as if delivered by the environment.
    pub(crate) fn apply_external(&self, event: &StorageEvent) {
        if event.key == self.key {
            apply_remote(self.label, &self.state, &self.normalize, event);
        }
    }

    /// Receiver notified after every change.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Synced<T>> {
        self.state.subscribe()
    }
}

fn apply_remote<T>(
    label: &'static str,
    state: &watch::Sender<Synced<T>>,
    normalize: &Normalize<T>,
    event: &StorageEvent,
) where
    T: DeserializeOwned + Default,
{
    let Some(raw) = event.new_value.as_deref() else {
        debug!(store = label, key = %event.key, "ignoring removal from another tab");
        return;
    };

    let value = match serde_json::from_str::<T>(raw) {
        Ok(value) => normalize(value),
        Err(e) => {
            warn!(store = label, key = %event.key, error = %e, "malformed payload from another tab");
            T::default()
        }
    };

    state.send_replace(Synced {
        value,
        origin: ChangeOrigin::Remote,
    });
    debug!(store = label, key = %event.key, source = %event.source, "replaced state from another tab");
}
