//! End-to-end session behavior across tabs and overlapping requests.

use edu_market::latency::SimulatedLatency;
use edu_market::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

const FIXTURE: &str = include_str!("../../../fixtures/catalog.json");

fn catalog() -> Catalog {
    Catalog::from_json_str(FIXTURE).unwrap()
}

fn quick_config() -> MarketConfig {
    let mut config = MarketConfig::default();
    config.suggestions.latency = LatencyConfig::fixed(Duration::from_millis(2000));
    config.chat.latency = LatencyConfig::fixed(Duration::from_millis(1000));
    config
}

/// A seeded latency whose first sample is clearly longer than its second, so
/// the first of two overlapping requests resolves last.
fn out_of_order_latency() -> LatencyConfig {
    (0..)
        .map(|seed| {
            LatencyConfig::fixed(Duration::from_millis(100))
                .with_jitter(Duration::from_millis(1000))
                .with_seed(seed)
        })
        .find(|config| {
            let latency = SimulatedLatency::new(config.clone());
            let (first, _) = latency.sample();
            let (second, _) = latency.sample();
            first > second + Duration::from_millis(10)
        })
        .unwrap()
}

#[test]
fn test_remote_favorites_overwrite_local() {
    let origin = Origin::in_memory();
    let tab_a = Market::open(quick_config(), catalog(), origin.open_tab()).unwrap();
    let tab_b = FavoritesStore::open(origin.open_tab(), "edumarket_favorites");

    tab_a.favorites().add("A");
    tab_a.favorites().add("B");
    assert_eq!(tab_b.count(), 2);

    let mut rx = tab_a.favorites().subscribe();
    tab_b.remove("A");
    tab_b.remove("B");
    tab_b.add("C");

    assert_eq!(tab_a.favorites().all(), HashSet::from([ProductId::new("C")]));
    let latest = rx.borrow_and_update().clone();
    assert_eq!(latest.origin, ChangeOrigin::Remote);
}

#[test]
fn test_external_event_replaces_whole_set() {
    let origin = Origin::in_memory();
    let market = Market::open(quick_config(), catalog(), origin.open_tab()).unwrap();
    market.favorites().add("A");
    market.favorites().add("B");

    let delivered = origin.broadcast(&StorageEvent::external(
        "edumarket_favorites",
        Some(r#"["C"]"#.to_string()),
    ));
    assert!(delivered >= 1);
    assert_eq!(market.favorites().all(), HashSet::from([ProductId::new("C")]));
}

#[test]
fn test_history_bounded_across_reload() {
    let origin = Origin::in_memory();
    {
        let market = Market::open(quick_config(), catalog(), origin.open_tab()).unwrap();
        for id in 1..=12 {
            market.view_product(&id.to_string());
        }
        market.view_product("3");
        market.view_product("4");
        market.view_product("5");
        assert_eq!(market.history().count(), 10);
    }

    let reopened = Market::open(quick_config(), catalog(), origin.open_tab()).unwrap();
    let ids: Vec<String> = reopened
        .history()
        .all()
        .into_iter()
        .map(|p| p.id.into_inner())
        .collect();
    assert_eq!(ids, vec!["5", "4", "3", "12", "11", "10", "9", "8", "7", "6"]);
}

#[test]
fn test_favorites_survive_reload_and_toggle_restores() {
    let origin = Origin::in_memory();
    let market = Market::open(quick_config(), catalog(), origin.open_tab()).unwrap();
    market.toggle_favorite("2");
    market.toggle_favorite("7");
    drop(market);

    let market = Market::open(quick_config(), catalog(), origin.open_tab()).unwrap();
    let before = market.favorites().all();
    assert_eq!(before.len(), 2);

    assert_eq!(market.toggle_favorite("9"), Some(true));
    assert_eq!(market.toggle_favorite("9"), Some(false));
    assert_eq!(market.favorites().all(), before);
}

#[test]
fn test_browse_fixture() {
    let market = Market::open(quick_config(), catalog(), Origin::in_memory().open_tab()).unwrap();
    let mut browser = market.browser();
    browser.update_filters(CriteriaPatch::new().category(Some("Lập trình")));
    browser.top_rated();

    let page = browser.current_page();
    let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "10"]);
    assert_eq!(page.pagination.total, 2);
}

#[tokio::test(start_paused = true)]
async fn test_cold_start_suggestions() {
    let market = Market::open(quick_config(), catalog(), Origin::in_memory().open_tab()).unwrap();
    let suggestions = market.refresh_suggestions().await.unwrap();
    let ids: Vec<&str> = suggestions.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1", "5"]);
}

#[tokio::test(start_paused = true)]
async fn test_suggestions_exclude_seen_courses() {
    let market = Market::open(quick_config(), catalog(), Origin::in_memory().open_tab()).unwrap();
    market.view_product("10");
    market.toggle_favorite("1");

    let suggestions = market.refresh_suggestions().await.unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 6);
    assert!(suggestions
        .iter()
        .all(|p| p.id.as_str() != "10" && p.id.as_str() != "1"));
}

#[tokio::test(start_paused = true)]
async fn test_last_resolved_suggestions_win_unfenced() {
    let mut config = quick_config();
    config.suggestions.latency = out_of_order_latency();
    let feed = SuggestionFeed::new(&config.suggestions);
    let catalog = catalog();
    let coding = vec![catalog.get("10").unwrap().clone()];
    let empty = HashSet::new();

    let (first, second) = tokio::join!(
        feed.refresh(&catalog, &[], &empty),
        feed.refresh(&catalog, &coding, &empty),
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first, second);

    let state = feed.current();
    assert_eq!(state.suggestions, first);
    assert_eq!(state.request, 1);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_fenced_suggestions_drop_stale() {
    let mut config = quick_config();
    config.suggestions.latency = out_of_order_latency();
    config.suggestions.fence_stale_responses = true;
    let feed = SuggestionFeed::new(&config.suggestions);
    let catalog = catalog();
    let coding = vec![catalog.get("10").unwrap().clone()];
    let empty = HashSet::new();

    let (_, second) = tokio::join!(
        feed.refresh(&catalog, &[], &empty),
        feed.refresh(&catalog, &coding, &empty),
    );

    let state = feed.current();
    assert_eq!(state.suggestions, second.unwrap());
    assert_eq!(state.request, 2);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_chat_replies_land_in_resolve_order() {
    let mut config = quick_config();
    config.chat.latency = out_of_order_latency();
    let assistant = Assistant::new(&config.chat);

    let (english, marketing) = tokio::join!(
        assistant.send_message("english"),
        assistant.send_message("marketing"),
    );
    let (english, marketing) = (english.unwrap().unwrap(), marketing.unwrap().unwrap());

    let messages: Vec<String> = assistant
        .current()
        .messages
        .into_iter()
        .map(|m| m.message)
        .collect();
    assert_eq!(
        messages[1..],
        [
            "english".to_string(),
            "marketing".to_string(),
            marketing.message,
            english.message,
        ]
    );
    assert!(!assistant.current().is_typing);
}
