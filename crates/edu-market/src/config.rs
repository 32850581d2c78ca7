//! Session configuration.
//!
//! Loaded from TOML (or JSON when the file ends in `.json`). Every section and
//! field is optional; omitted values fall back to the defaults below.

use crate::MarketError;
use anyhow::{Context, Result};
use edu_catalog::search::{SortKey, SortOrder};
use edu_catalog::suggest::SuggestionPolicy;
use edu_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub browse: BrowseConfig,

    #[serde(default)]
    pub suggestions: SuggestionsConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl MarketConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.browse.page_size == 0 {
            return Err(MarketError::InvalidConfig("browse.page_size must be at least 1".into()));
        }
        if self.storage.history_limit == 0 {
            return Err(MarketError::InvalidConfig(
                "storage.history_limit must be at least 1".into(),
            ));
        }
        if self.storage.favorites_key == self.storage.history_key {
            return Err(MarketError::InvalidConfig(
                "storage keys for favorites and history must differ".into(),
            ));
        }
        self.suggestions.latency.validate("suggestions.latency")?;
        self.chat.latency.validate("chat.latency")?;
        Ok(())
    }
}

/// Durable storage keys and bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub favorites_key: String,
    pub history_key: String,
    /// Maximum number of history entries kept.
    pub history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            favorites_key: "edumarket_favorites".to_string(),
            history_key: "edumarket_history".to_string(),
            history_limit: 10,
        }
    }
}

/// Initial browse settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub page_size: usize,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: 9,
            sort_key: SortKey::Name,
            sort_order: SortOrder::Asc,
        }
    }
}

/// Simulated request delay and failure injection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Fixed part of the delay.
    pub base_ms: u64,
    /// Upper bound of the uniformly random extra delay.
    pub jitter_ms: u64,
    /// Probability in `[0, 1]` that a request fails.
    pub failure_rate: f64,
    /// Seed for reproducible jitter and failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl LatencyConfig {
    pub fn fixed(base: Duration) -> Self {
        Self {
            base_ms: base.as_millis() as u64,
            jitter_ms: 0,
            failure_rate: 0.0,
            seed: None,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter_ms = jitter.as_millis() as u64;
        self
    }

    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self, section: &str) -> Result<(), MarketError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(MarketError::InvalidConfig(format!(
                "{section}.failure_rate must be within [0, 1], got {}",
                self.failure_rate
            )));
        }
        Ok(())
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self::fixed(Duration::from_millis(1000))
    }
}

/// Suggestion feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub policy: SuggestionPolicy,
    pub latency: LatencyConfig,
    /// Drop responses that resolve after a newer request has been issued.
    pub fence_stale_responses: bool,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            policy: SuggestionPolicy::default(),
            latency: LatencyConfig::fixed(Duration::from_millis(2000)),
            fence_stale_responses: false,
        }
    }
}

/// Chat assistant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub latency: LatencyConfig,
    /// Keep the typing indicator up until the newest request resolves.
    pub fence_stale_responses: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            latency: LatencyConfig::fixed(Duration::from_millis(1000))
                .with_jitter(Duration::from_millis(1000)),
            fence_stale_responses: false,
        }
    }
}
