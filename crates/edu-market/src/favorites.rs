//! Favorites: a persisted set of product ids.

use crate::synced::{Synced, SyncedState};
use edu_catalog::catalog::{select_by_ids, Catalog, Product};
use edu_catalog::ProductId;
use edu_storage::{LocalStore, StorageEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::watch;
use tracing::debug;

/// Favorited product ids, kept in the order they were added.
///
/// Persisted as a JSON array of id strings. Duplicates in a loaded payload
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(Vec<ProductId>);

impl FavoriteSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|fav| fav.as_str() == id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: ProductId) -> bool {
        if self.contains(id.as_str()) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Returns `false` if the id was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|fav| fav.as_str() != id);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.0.iter()
    }

    pub fn to_set(&self) -> HashSet<ProductId> {
        self.0.iter().cloned().collect()
    }

    fn dedup(self) -> Self {
        let mut set = Self::default();
        for id in self.0 {
            set.insert(id);
        }
        set
    }
}

impl FromIterator<ProductId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self(iter.into_iter().collect()).dedup()
    }
}

/// The user's favorites, persisted and synced across tabs.
pub struct FavoritesStore {
    state: SyncedState<FavoriteSet>,
}

impl FavoritesStore {
    /// Hydrate from `key`. A missing or malformed payload starts empty.
    pub fn open(storage: LocalStore, key: impl Into<String>) -> Self {
        Self {
            state: SyncedState::open("favorites", storage, key, FavoriteSet::dedup),
        }
    }

    pub fn key(&self) -> &str {
        self.state.key()
    }

    /// Add an id. Adding an existing id changes nothing but still persists.
    pub fn add(&self, id: impl Into<ProductId>) {
        let id = id.into();
        debug!(product = %id, "favorite added");
        self.state.update(|set| {
            set.insert(id);
        });
    }

    pub fn remove(&self, id: &str) {
        debug!(product = id, "favorite removed");
        self.state.update(|set| {
            set.remove(id);
        });
    }

    /// Flip membership. Returns whether the id is a favorite afterwards.
    pub fn toggle(&self, id: impl Into<ProductId>) -> bool {
        let id = id.into();
        let now_favorite = self.state.update(|set| {
            if set.remove(id.as_str()) {
                false
            } else {
                set.insert(id.clone())
            }
        });
        debug!(product = %id, now_favorite, "favorite toggled");
        now_favorite
    }

    pub fn has(&self, id: &str) -> bool {
        self.state.read(|set| set.contains(id))
    }

    /// Snapshot of the current ids.
    pub fn all(&self) -> HashSet<ProductId> {
        self.state.read(FavoriteSet::to_set)
    }

    /// Current ids in insertion order.
    pub fn ids(&self) -> FavoriteSet {
        self.state.snapshot()
    }

    pub fn count(&self) -> usize {
        self.state.read(FavoriteSet::len)
    }

    /// Products whose id is in `ids`, in catalog order.
    ///
    /// Ids with no matching product are skipped.
    pub fn select_by_ids(products: &[Product], ids: &HashSet<ProductId>) -> Vec<Product> {
        select_by_ids(products, ids).into_iter().cloned().collect()
    }

    /// Catalog products that are favorites, in catalog order.
    pub fn favorite_products(&self, catalog: &Catalog) -> Vec<Product> {
        Self::select_by_ids(catalog.products(), &self.all())
    }

    /// Replace the set from a change made elsewhere.
    ///
    /// Delivered automatically for writes by other tabs on the same origin;
    /// hosts can call it for changes that arrive by other means.
    pub fn apply_external_change(&self, event: &StorageEvent) {
        self.state.apply_external(event);
    }

    /// Receiver notified after every change, local or remote.
    pub fn subscribe(&self) -> watch::Receiver<Synced<FavoriteSet>> {
        self.state.subscribe()
    }
}
