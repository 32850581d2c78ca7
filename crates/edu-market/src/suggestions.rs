//! Asynchronous suggestion feed with simulated latency.

use crate::config::SuggestionsConfig;
use crate::latency::{RequestGate, SimulatedLatency};
use crate::MarketError;
use edu_catalog::catalog::{Catalog, Product};
use edu_catalog::suggest::SuggestionPolicy;
use edu_catalog::ProductId;
use std::collections::HashSet;
use tokio::sync::watch;
use tracing::{debug, warn};

/// What the suggestion panel shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub suggestions: Vec<Product>,
    pub loading: bool,
    /// User-facing message of the last failed request.
    pub error: Option<String>,
    /// Ticket id of the request that last published.
    pub request: u64,
}

/// Latest-result slot for suggestion requests.
///
/// Each [`refresh`](Self::refresh) waits out the simulated latency and then
/// runs the suggestion cascade on the inputs it was given. When requests
/// overlap, the last one to resolve overwrites the slot unless stale-response
/// fencing is enabled.
pub struct SuggestionFeed {
    policy: SuggestionPolicy,
    latency: SimulatedLatency,
    gate: RequestGate,
    state: watch::Sender<FeedState>,
}

impl SuggestionFeed {
    pub fn new(config: &SuggestionsConfig) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            policy: config.policy.clone(),
            latency: SimulatedLatency::new(config.latency.clone()),
            gate: RequestGate::new(config.fence_stale_responses),
            state,
        }
    }

    pub fn policy(&self) -> &SuggestionPolicy {
        &self.policy
    }

    /// Request fresh suggestions.
    ///
    /// Returns this request's own outcome, whether or not it was published.
    pub async fn refresh(
        &self,
        catalog: &Catalog,
        history: &[Product],
        favorites: &HashSet<ProductId>,
    ) -> Result<Vec<Product>, MarketError> {
        let ticket = self.gate.begin();
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        debug!(request = ticket.id(), "suggestion request started");

        let outcome = match self.latency.wait().await {
            Ok(_) => Ok(self.policy.suggest(catalog.products(), history, favorites)),
            Err(_) => {
                warn!(request = ticket.id(), "suggestion request failed");
                Err(MarketError::SuggestionsUnavailable)
            }
        };

        if self.gate.admit(ticket) {
            let still_loading = self.gate.is_fenced() && !self.gate.is_latest(ticket);
            self.state.send_modify(|state| {
                match &outcome {
                    Ok(suggestions) => state.suggestions = suggestions.clone(),
                    Err(e) => state.error = Some(e.to_string()),
                }
                state.loading = still_loading;
                state.request = ticket.id();
            });
            debug!(request = ticket.id(), "suggestions published");
        } else {
            debug!(request = ticket.id(), "dropping stale suggestions");
        }

        outcome
    }

    /// Current panel state.
    pub fn current(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Receiver notified whenever the panel state changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use edu_catalog::Price;
    use std::time::Duration;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product::new("1", "A", Price::new(100)).with_rating(4.8),
            Product::new("2", "B", Price::new(100)).with_rating(4.2),
            Product::new("3", "C", Price::new(100)).with_rating(3.0),
        ])
        .unwrap()
    }

    fn config(base_ms: u64, failure_rate: f64) -> SuggestionsConfig {
        SuggestionsConfig {
            latency: LatencyConfig::fixed(Duration::from_millis(base_ms))
                .with_failure_rate(failure_rate),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_publishes_after_delay() {
        let feed = SuggestionFeed::new(&config(2000, 0.0));
        let catalog = catalog();
        let favorites = HashSet::new();

        let start = tokio::time::Instant::now();
        let result = feed.refresh(&catalog, &[], &favorites).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2000));

        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let state = feed.current();
        assert!(!state.loading);
        assert_eq!(state.suggestions, result);
        assert_eq!(state.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_sets_error_message() {
        let feed = SuggestionFeed::new(&config(10, 1.0));
        let err = feed
            .refresh(&catalog(), &[], &HashSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::SuggestionsUnavailable));

        let state = feed.current();
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Không thể lấy gợi ý lúc này. Vui lòng thử lại sau.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_pending() {
        let feed = SuggestionFeed::new(&config(500, 0.0));
        let catalog = catalog();
        let favorites = HashSet::new();
        let mut rx = feed.subscribe();

        let request = feed.refresh(&catalog, &[], &favorites);
        tokio::pin!(request);
        tokio::select! {
            _ = &mut request => panic!("resolved before the delay"),
            _ = rx.changed() => {}
        }
        assert!(feed.current().loading);

        request.await.unwrap();
        assert!(!feed.current().loading);
    }
}
