//! Viewing history: a bounded, most-recent-first list of products.

use crate::synced::{Synced, SyncedState};
use edu_catalog::catalog::Product;
use edu_storage::{LocalStore, StorageEvent};
use std::collections::HashSet;
use tokio::sync::watch;
use tracing::debug;

/// Recently viewed products, persisted and synced across tabs.
///
/// Entries are full product snapshots taken when they were viewed, unique by
/// id, newest first, and never more than the configured limit.
pub struct HistoryStore {
    state: SyncedState<Vec<Product>>,
    limit: usize,
}

impl HistoryStore {
    /// Hydrate from `key`. A missing or malformed payload starts empty.
    pub fn open(storage: LocalStore, key: impl Into<String>, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            state: SyncedState::open("history", storage, key, move |entries| {
                normalize(entries, limit)
            }),
            limit,
        }
    }

    pub fn key(&self) -> &str {
        self.state.key()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Move `product` to the front, dropping any older entry with the same id
    /// and anything past the limit.
    pub fn record(&self, product: &Product) {
        let limit = self.limit;
        let len = self.state.update(|entries| {
            entries.retain(|entry| entry.id != product.id);
            entries.insert(0, product.clone());
            entries.truncate(limit);
            entries.len()
        });
        debug!(product = %product.id, len, "history recorded");
    }

    pub fn remove(&self, id: &str) {
        self.state.update(|entries| entries.retain(|entry| entry.id.as_str() != id));
        debug!(product = id, "history entry removed");
    }

    pub fn clear(&self) {
        self.state.update(Vec::clear);
        debug!("history cleared");
    }

    /// Snapshot, newest first.
    pub fn all(&self) -> Vec<Product> {
        self.state.snapshot()
    }

    pub fn count(&self) -> usize {
        self.state.read(Vec::len)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read(|entries| entries.iter().any(|entry| entry.id.as_str() == id))
    }

    /// Replace the list from a change made elsewhere.
    pub fn apply_external_change(&self, event: &StorageEvent) {
        self.state.apply_external(event);
    }

    /// Receiver notified after every change, local or remote.
    pub fn subscribe(&self) -> watch::Receiver<Synced<Vec<Product>>> {
        self.state.subscribe()
    }
}

fn normalize(entries: Vec<Product>, limit: usize) -> Vec<Product> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_catalog::Price;
    use edu_storage::Origin;

    const KEY: &str = "edumarket_history";

    fn course(id: &str) -> Product {
        Product::new(id, format!("Course {id}"), Price::new(100_000))
    }

    fn ids(history: &HistoryStore) -> Vec<String> {
        history
            .all()
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect()
    }

    #[test]
    fn test_record_moves_to_front() {
        let history = HistoryStore::open(Origin::in_memory().open_tab(), KEY, 10);
        history.record(&course("a"));
        history.record(&course("b"));
        history.record(&course("a"));
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn test_limit_keeps_most_recent() {
        let history = HistoryStore::open(Origin::in_memory().open_tab(), KEY, 10);
        for i in 1..=15 {
            history.record(&course(&i.to_string()));
        }
        assert_eq!(history.count(), 10);
        let expected: Vec<String> = (6..=15).rev().map(|i| i.to_string()).collect();
        assert_eq!(ids(&history), expected);
    }

    #[test]
    fn test_clear_and_remove_persist() {
        let storage = Origin::in_memory().open_tab();
        let history = HistoryStore::open(storage.clone(), KEY, 10);
        history.record(&course("a"));
        history.record(&course("b"));

        history.remove("a");
        assert!(!history.contains("a"));
        let persisted: Vec<Product> = storage.get(KEY).unwrap().unwrap();
        assert_eq!(persisted.len(), 1);

        history.clear();
        assert_eq!(storage.get_raw(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_hydration_enforces_invariants() {
        let storage = Origin::in_memory().open_tab();
        let stored = vec![course("a"), course("b"), course("a"), course("c")];
        storage.set(KEY, &stored).unwrap();

        let history = HistoryStore::open(storage, KEY, 2);
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn test_fractional_price_does_not_drop_history() {
        let storage = Origin::in_memory().open_tab();
        storage
            .set_raw(
                KEY,
                r#"[{"id":"a","name":"Figma","price":499000.5},{"id":"b","name":"Rust","price":900000}]"#,
            )
            .unwrap();

        let history = HistoryStore::open(storage, KEY, 10);
        assert_eq!(ids(&history), vec!["a", "b"]);
        assert_eq!(history.all()[0].price, Price::new(499_001));
    }

    #[test]
    fn test_external_change_replaces_list() {
        let history = HistoryStore::open(Origin::in_memory().open_tab(), KEY, 10);
        history.record(&course("a"));

        let payload = serde_json::to_string(&vec![course("x"), course("y")]).unwrap();
        history.apply_external_change(&StorageEvent::external(KEY, Some(payload)));
        assert_eq!(ids(&history), vec!["x", "y"]);

        history.apply_external_change(&StorageEvent::external(KEY, Some("[{]".into())));
        assert_eq!(history.count(), 0);
    }

    #[test]
    fn test_snapshot_is_kept_even_if_catalog_changes() {
        let history = HistoryStore::open(Origin::in_memory().open_tab(), KEY, 10);
        let mut product = course("a");
        history.record(&product);
        product.name = "Renamed".to_string();
        assert_eq!(history.all()[0].name, "Course a");
    }
}
