//! Session layer for EduMarket.
//!
//! Wires the pure catalog logic to durable storage and simulated latency:
//!
//! - **Favorites / History**: persisted stores kept in sync across tabs
//! - **Browser**: filter, sort and page state for the listing
//! - **Suggestions / Chat**: async requests with simulated delay and failure
//! - **Config**: `MarketConfig`, loadable from TOML or JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use edu_market::prelude::*;
//!
//! let config = MarketConfig::load("market.toml")?;
//! edu_observability::init_logging(&config.logging)?;
//!
//! let json = std::fs::read_to_string("catalog.json")?;
//! let market = Market::from_json(config, &json, Origin::in_memory().open_tab())?;
//!
//! market.toggle_favorite("2");
//! market.view_product("5");
//! let suggestions = market.refresh_suggestions().await?;
//! ```

mod error;
mod synced;

pub mod browser;
pub mod chat;
pub mod config;
pub mod favorites;
pub mod history;
pub mod latency;
pub mod suggestions;

pub use error::MarketError;
pub use synced::{ChangeOrigin, Synced};

use browser::CatalogBrowser;
use chat::Assistant;
use config::MarketConfig;
use edu_catalog::catalog::{Catalog, Product};
use edu_storage::LocalStore;
use favorites::FavoritesStore;
use history::HistoryStore;
use std::sync::Arc;
use suggestions::SuggestionFeed;
use tracing::{debug, info};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::browser::CatalogBrowser;
    pub use crate::chat::{reply_for, Assistant, ChatMessage, ChatState, MessageId};
    pub use crate::config::{
        BrowseConfig, ChatConfig, LatencyConfig, MarketConfig, StorageConfig, SuggestionsConfig,
    };
    pub use crate::favorites::{FavoriteSet, FavoritesStore};
    pub use crate::history::HistoryStore;
    pub use crate::suggestions::{FeedState, SuggestionFeed};
    pub use crate::{ChangeOrigin, Market, MarketError, Synced};

    pub use edu_catalog::prelude::*;
    pub use edu_storage::{LocalStore, Origin, StorageEvent};
}

/// One user session in one tab.
pub struct Market {
    config: MarketConfig,
    catalog: Arc<Catalog>,
    favorites: FavoritesStore,
    history: HistoryStore,
    suggestions: SuggestionFeed,
    assistant: Assistant,
}

impl Market {
    /// Validate `config` and hydrate the stores from `storage`.
    pub fn open(
        config: MarketConfig,
        catalog: Catalog,
        storage: LocalStore,
    ) -> Result<Self, MarketError> {
        config.validate()?;

        let favorites = FavoritesStore::open(storage.clone(), &config.storage.favorites_key);
        let history = HistoryStore::open(
            storage.clone(),
            &config.storage.history_key,
            config.storage.history_limit,
        );
        let suggestions = SuggestionFeed::new(&config.suggestions);
        let assistant = Assistant::new(&config.chat);

        info!(
            tab = %storage.tab(),
            products = catalog.len(),
            favorites = favorites.count(),
            history = history.count(),
            "session opened"
        );

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            favorites,
            history,
            suggestions,
            assistant,
        })
    }

    /// Parse the catalog from a JSON array of products, then [`Market::open`].
    pub fn from_json(
        config: MarketConfig,
        catalog_json: &str,
        storage: LocalStore,
    ) -> Result<Self, MarketError> {
        let catalog = Catalog::from_json_str(catalog_json)?;
        Self::open(config, catalog, storage)
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn suggestions(&self) -> &SuggestionFeed {
        &self.suggestions
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// A fresh listing view with the configured page size and sort.
    pub fn browser(&self) -> CatalogBrowser {
        CatalogBrowser::new(Arc::clone(&self.catalog), &self.config.browse)
    }

    /// Open a product's detail view, recording it in history.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn view_product(&self, id: &str) -> Option<Product> {
        let Some(product) = self.catalog.get(id) else {
            debug!(product = id, "view of unknown product skipped");
            return None;
        };
        self.history.record(product);
        Some(product.clone())
    }

    /// Toggle a catalog product's favorite flag.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn toggle_favorite(&self, id: &str) -> Option<bool> {
        let Some(product) = self.catalog.get(id) else {
            debug!(product = id, "favorite toggle for unknown product skipped");
            return None;
        };
        Some(self.favorites.toggle(product.id.clone()))
    }

    pub fn favorite_products(&self) -> Vec<Product> {
        self.favorites.favorite_products(&self.catalog)
    }

    /// Refresh suggestions from the current history and favorites.
    ///
    /// Inputs are captured when the request starts.
    pub async fn refresh_suggestions(&self) -> Result<Vec<Product>, MarketError> {
        let history = self.history.all();
        let favorites = self.favorites.all();
        self.suggestions
            .refresh(&self.catalog, &history, &favorites)
            .await
    }
}
