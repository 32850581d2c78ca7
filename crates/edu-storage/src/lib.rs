//! Type-safe durable key-value storage for EduMarket.
//!
//! Models the browser's per-origin local storage: one [`Origin`] owns the
//! backing store and every open tab gets a [`LocalStore`] handle onto it.
//! Writes through one handle are delivered as [`StorageEvent`]s to the
//! listeners of every *other* handle on the same origin, never to the writer.
//!
//! # Example
//!
//! ```rust,ignore
//! use edu_storage::{Origin, StorageEvent};
//!
//! let origin = Origin::in_memory();
//! let tab_a = origin.open_tab();
//! let tab_b = origin.open_tab();
//!
//! let _sub = tab_b.subscribe(|event: &StorageEvent| {
//!     println!("{} changed to {:?}", event.key, event.new_value);
//! });
//!
//! // Store a value (tab_b's listener fires, tab_a's would not)
//! tab_a.set("edumarket_favorites", &vec!["1", "2"])?;
//!
//! // Retrieve a value
//! let ids: Option<Vec<String>> = tab_b.get("edumarket_favorites")?;
//! ```

mod backend;
mod error;
mod events;
mod store;

pub use backend::{MemoryBackend, StorageBackend};
pub use error::StorageError;
pub use events::{StorageEvent, Subscription, TabId};
pub use store::{LocalStore, Origin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{LocalStore, Origin, StorageError, StorageEvent, Subscription, TabId};
}
