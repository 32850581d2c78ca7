//! Filter criteria and the filter engine.

use crate::catalog::{Level, Product};
use crate::price::Price;
use serde::{Deserialize, Serialize};

/// Price tier used by the price filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriceRange {
    /// Inclusive lower bound and exclusive upper bound (`None` = unbounded).
    pub fn bounds(&self) -> (Price, Option<Price>) {
        match self {
            PriceRange::All => (Price::zero(), None),
            PriceRange::Low => (Price::zero(), Some(Price::new(500_000))),
            PriceRange::Medium => (Price::new(500_000), Some(Price::new(1_000_000))),
            PriceRange::High => (Price::new(1_000_000), None),
        }
    }

    /// Check if a listed price falls in this tier.
    pub fn contains(&self, price: Price) -> bool {
        let (min, max) = self.bounds();
        price >= min && max.map_or(true, |max| price < max)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::All => "all",
            PriceRange::Low => "low",
            PriceRange::Medium => "medium",
            PriceRange::High => "high",
        }
    }

    /// Localized label for the price selector.
    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "Tất cả mức giá",
            PriceRange::Low => "Dưới 500k",
            PriceRange::Medium => "500k - 1 triệu",
            PriceRange::High => "Trên 1 triệu",
        }
    }
}

/// Current filter configuration.
///
/// `FilterCriteria::default()` is the reset record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name, category, instructor.
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Minimum rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a partial update. Fields the patch leaves alone keep their value.
    pub fn merge(mut self, patch: CriteriaPatch) -> Self {
        self.apply(patch);
        self
    }

    /// In-place variant of [`merge`](Self::merge).
    pub fn apply(&mut self, patch: CriteriaPatch) {
        if let Some(term) = patch.search_term {
            self.search_term = term;
        }
        if let Some(range) = patch.price_range {
            self.price_range = range;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }

    /// Check if no constraint is active.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_empty()
            && self.price_range == PriceRange::All
            && self.active_category().is_none()
            && self.level.is_none()
            && self.rating.is_none()
    }

    /// Category constraint, treating an empty string as unset.
    fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Check a single product against every active constraint.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.search_term.is_empty() {
            let needle = self.search_term.to_lowercase();
            let hit = [&product.name, &product.category, &product.instructor]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if !self.price_range.contains(product.price) {
            return false;
        }

        if let Some(category) = self.active_category() {
            if product.category != category {
                return false;
            }
        }

        if let Some(level) = self.level {
            if product.level != level {
                return false;
            }
        }

        if let Some(min) = self.rating {
            if product.rating < min {
                return false;
            }
        }

        true
    }
}

/// Partial update for [`FilterCriteria`].
///
/// The outer `Option` means "touch this field"; for clearable fields the inner
/// `Option` carries the new value or `None` to clear it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriteriaPatch {
    pub search_term: Option<String>,
    pub price_range: Option<PriceRange>,
    pub category: Option<Option<String>>,
    pub level: Option<Option<Level>>,
    pub rating: Option<Option<f64>>,
}

impl CriteriaPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = Some(category.map(Into::into));
        self
    }

    pub fn level(mut self, level: Option<Level>) -> Self {
        self.level = Some(level);
        self
    }

    pub fn rating(mut self, rating: Option<f64>) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Keep the products that satisfy `criteria`, in input order.
pub fn filter_products(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    if criteria.is_unfiltered() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p1() -> Product {
        Product::new("P1", "Lập trình Python", Price::new(400_000))
            .with_category("Lập trình")
            .with_instructor("Nguyễn Văn A")
            .with_level(Level::Beginner)
            .with_rating(4.2)
    }

    fn p2() -> Product {
        Product::new("P2", "Digital Marketing", Price::new(900_000))
            .with_category("Marketing")
            .with_instructor("Trần Thị B")
            .with_level(Level::Advanced)
            .with_rating(3.0)
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_low_price_tier() {
        let criteria = FilterCriteria::default().merge(CriteriaPatch::new().price_range(PriceRange::Low));
        assert_eq!(ids(&filter_products(&[p1(), p2()], &criteria)), vec!["P1"]);
    }

    #[test]
    fn test_category_exact_match() {
        let criteria =
            FilterCriteria::default().merge(CriteriaPatch::new().category(Some("Marketing")));
        assert_eq!(ids(&filter_products(&[p1(), p2()], &criteria)), vec!["P2"]);

        let criteria =
            FilterCriteria::default().merge(CriteriaPatch::new().category(Some("market")));
        assert!(filter_products(&[p1(), p2()], &criteria).is_empty());
    }

    #[test]
    fn test_empty_category_is_unset() {
        let criteria = FilterCriteria::default().merge(CriteriaPatch::new().category(Some("")));
        assert_eq!(filter_products(&[p1(), p2()], &criteria).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_over_three_fields() {
        let by_name = FilterCriteria::default().merge(CriteriaPatch::new().search_term("PYTHON"));
        assert_eq!(ids(&filter_products(&[p1(), p2()], &by_name)), vec!["P1"]);

        let by_instructor =
            FilterCriteria::default().merge(CriteriaPatch::new().search_term("trần"));
        assert_eq!(ids(&filter_products(&[p1(), p2()], &by_instructor)), vec!["P2"]);

        let by_category =
            FilterCriteria::default().merge(CriteriaPatch::new().search_term("lập"));
        assert_eq!(ids(&filter_products(&[p1(), p2()], &by_category)), vec!["P1"]);
    }

    #[test]
    fn test_price_tier_bounds() {
        assert!(PriceRange::Low.contains(Price::new(499_999)));
        assert!(!PriceRange::Low.contains(Price::new(500_000)));
        assert!(PriceRange::Medium.contains(Price::new(500_000)));
        assert!(!PriceRange::Medium.contains(Price::new(1_000_000)));
        assert!(PriceRange::High.contains(Price::new(1_000_000)));
        assert!(PriceRange::All.contains(Price::new(u64::MAX)));
    }

    #[test]
    fn test_price_filter_uses_listed_price() {
        // 600k discounted to 300k is still a medium-tier course.
        let discounted = Product::new("D", "Discounted", Price::new(600_000)).with_discount(50);
        let low = FilterCriteria::default().merge(CriteriaPatch::new().price_range(PriceRange::Low));
        assert!(filter_products(&[discounted], &low).is_empty());
    }

    #[test]
    fn test_level_and_rating() {
        let criteria = FilterCriteria::default().merge(
            CriteriaPatch::new()
                .level(Some(Level::Beginner))
                .rating(Some(4.0)),
        );
        assert_eq!(ids(&filter_products(&[p1(), p2()], &criteria)), vec!["P1"]);

        let strict = criteria.merge(CriteriaPatch::new().rating(Some(4.5)));
        assert!(filter_products(&[p1(), p2()], &strict).is_empty());
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let criteria = FilterCriteria::default()
            .merge(CriteriaPatch::new().search_term("rust").category(Some("Lập trình")));
        let criteria = criteria.merge(CriteriaPatch::new().price_range(PriceRange::High));
        assert_eq!(criteria.search_term, "rust");
        assert_eq!(criteria.category.as_deref(), Some("Lập trình"));
        assert_eq!(criteria.price_range, PriceRange::High);

        let cleared = criteria.merge(CriteriaPatch::new().category(None::<String>));
        assert_eq!(cleared.category, None);
        assert_eq!(cleared.search_term, "rust");
    }

    #[test]
    fn test_empty_catalog_and_impossible_criteria() {
        let criteria = FilterCriteria::default().merge(CriteriaPatch::new().rating(Some(6.0)));
        assert!(filter_products(&[], &criteria).is_empty());
        assert!(filter_products(&[p1(), p2()], &criteria).is_empty());
    }

    #[test]
    fn test_criteria_serde_shape() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"searchTerm":"x","priceRange":"medium"}"#).unwrap();
        assert_eq!(criteria.price_range, PriceRange::Medium);
        assert_eq!(criteria.search_term, "x");
        assert!(criteria.level.is_none());
    }
}
