//! Heuristic course suggestions.
//!
//! A priority cascade over the catalog: courses in categories the user has
//! shown interest in, then courses at familiar levels, then top-rated courses.
//! Users with no history and no favorites get a small set of well-rated
//! courses instead.

use crate::catalog::{Level, Product};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Thresholds and caps for the suggestion cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionPolicy {
    /// Maximum number of suggestions returned.
    pub max_results: usize,
    /// Cap and minimum rating for the category tier.
    pub category_limit: usize,
    pub category_min_rating: f64,
    /// Cap and minimum rating for the level tier.
    pub level_limit: usize,
    pub level_min_rating: f64,
    /// Minimum rating for the top-rated fill tier.
    pub top_rated_min_rating: f64,
    /// Size and minimum rating of the cold-start list.
    pub fallback_limit: usize,
    pub fallback_min_rating: f64,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            max_results: 6,
            category_limit: 3,
            category_min_rating: 4.0,
            level_limit: 2,
            level_min_rating: 3.5,
            top_rated_min_rating: 4.5,
            fallback_limit: 3,
            fallback_min_rating: 4.0,
        }
    }
}

/// Suggest courses with the default policy.
pub fn suggest(
    catalog: &[Product],
    history: &[Product],
    favorites: &HashSet<ProductId>,
) -> Vec<Product> {
    SuggestionPolicy::default().suggest(catalog, history, favorites)
}

impl SuggestionPolicy {
    /// Run the cascade. Deterministic for identical inputs.
    pub fn suggest(
        &self,
        catalog: &[Product],
        history: &[Product],
        favorites: &HashSet<ProductId>,
    ) -> Vec<Product> {
        let favorited: Vec<&Product> = catalog
            .iter()
            .filter(|p| favorites.contains(&p.id))
            .collect();

        let mut picked: Vec<&Product> = Vec::new();

        if !history.is_empty() || !favorites.is_empty() {
            let seen: HashSet<&str> = history
                .iter()
                .map(|p| p.id.as_str())
                .chain(favorites.iter().map(|id| id.as_str()))
                .collect();
            let interest = favorited.iter().copied().chain(history.iter());
            let (categories, levels): (HashSet<&str>, HashSet<Level>) = interest
                .map(|p| (p.category.as_str(), p.level))
                .unzip();

            // Category tier
            let tier = self.tier(catalog, &seen, &picked, |p| {
                categories.contains(p.category.as_str()) && p.rating >= self.category_min_rating
            });
            picked.extend(tier.into_iter().take(self.category_limit));

            // Level tier
            if picked.len() < self.max_results {
                let tier = self.tier(catalog, &seen, &picked, |p| {
                    levels.contains(&p.level) && p.rating >= self.level_min_rating
                });
                picked.extend(tier.into_iter().take(self.level_limit));
            }

            // Top-rated fill
            if picked.len() < self.max_results {
                let mut tier = self.tier(catalog, &seen, &picked, |p| {
                    p.rating >= self.top_rated_min_rating
                });
                tier.sort_by(|a, b| {
                    by_rating_desc(a, b).then_with(|| b.students_count.cmp(&a.students_count))
                });
                let room = self.max_results - picked.len();
                picked.extend(tier.into_iter().take(room));
            }
        }

        if picked.is_empty() {
            let mut tier: Vec<&Product> = catalog
                .iter()
                .filter(|p| p.rating >= self.fallback_min_rating)
                .collect();
            tier.sort_by(|a, b| by_rating_desc(a, b));
            picked.extend(tier.into_iter().take(self.fallback_limit));
            debug!(count = picked.len(), "cold-start suggestions");
        } else {
            debug!(count = picked.len(), "personalized suggestions");
        }

        picked.truncate(self.max_results);
        picked.into_iter().cloned().collect()
    }

    /// Eligible candidates for one tier, sorted by rating descending (stable).
    fn tier<'a>(
        &self,
        catalog: &'a [Product],
        seen: &HashSet<&str>,
        picked: &[&Product],
        accept: impl Fn(&Product) -> bool,
    ) -> Vec<&'a Product> {
        let mut candidates: Vec<&'a Product> = catalog
            .iter()
            .filter(|p| !seen.contains(p.id.as_str()))
            .filter(|p| !picked.iter().any(|q| q.id == p.id))
            .filter(|p| accept(p))
            .collect();
        candidates.sort_by(|a, b| by_rating_desc(a, b));
        candidates
    }
}

fn by_rating_desc(a: &Product, b: &Product) -> Ordering {
    b.rating.total_cmp(&a.rating)
}
