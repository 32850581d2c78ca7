//! Catalog browsing view state: criteria, sort and current page.

use crate::config::BrowseConfig;
use edu_catalog::catalog::{Catalog, Product};
use edu_catalog::search::{
    filter_products, paginate, sort_products, CriteriaPatch, FilterCriteria, Page, Pagination,
    SortKey, SortOrder,
};
use std::sync::Arc;
use tracing::debug;

/// View state for the product listing.
///
/// The visible list is always `paginate(sort(filter(catalog)))`. Any change
/// to the criteria or the sort goes back to page 1.
#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    catalog: Arc<Catalog>,
    criteria: FilterCriteria,
    sort_key: SortKey,
    sort_order: SortOrder,
    page: usize,
    page_size: usize,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<Catalog>, config: &BrowseConfig) -> Self {
        Self {
            catalog,
            criteria: FilterCriteria::default(),
            sort_key: config.sort_key,
            sort_order: config.sort_order,
            page: 1,
            page_size: config.page_size.max(1),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> (SortKey, SortOrder) {
        (self.sort_key, self.sort_order)
    }

    /// Current 1-indexed page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Merge a partial criteria update.
    pub fn update_filters(&mut self, patch: CriteriaPatch) {
        self.criteria.apply(patch);
        self.page = 1;
        debug!(criteria = ?self.criteria, "filters updated");
    }

    /// Back to the unfiltered view.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.page = 1;
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.sort_key = key;
        self.sort_order = order;
        self.page = 1;
        debug!(key = key.as_str(), ?order, "sort changed");
    }

    /// Sort by `key`, flipping the order if it already is the sort key.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let order = if self.sort_key == key {
            self.sort_order.reversed()
        } else {
            SortOrder::Asc
        };
        self.set_sort(key, order);
    }

    /// Highest rated first.
    pub fn top_rated(&mut self) {
        self.set_sort(SortKey::Rating, SortOrder::Desc);
    }

    /// Most recently created first.
    pub fn newest(&mut self) {
        self.set_sort(SortKey::CreatedAt, SortOrder::Desc);
    }

    /// Go to `page`, clamped into the available range. Returns the page used.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = self.clamp_page(page);
        self.page
    }

    /// Clamp a page number against the current result count.
    pub fn clamp_page(&self, page: usize) -> usize {
        self.pagination_for(self.result_count()).clamp_page(page)
    }

    /// Every product matching the criteria, in sort order.
    pub fn results(&self) -> Vec<Product> {
        let filtered = filter_products(self.catalog.products(), &self.criteria);
        sort_products(&filtered, self.sort_key, self.sort_order)
    }

    pub fn result_count(&self) -> usize {
        self.catalog
            .products()
            .iter()
            .filter(|p| self.criteria.matches(p))
            .count()
    }

    /// The visible page.
    pub fn current_page(&self) -> Page<Product> {
        paginate(&self.results(), self.page, self.page_size)
    }

    fn pagination_for(&self, total: usize) -> Pagination {
        Pagination::new(self.page, self.page_size, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_catalog::search::PriceRange;
    use edu_catalog::Price;

    fn browser(count: u64) -> CatalogBrowser {
        let products = (1..=count)
            .map(|i| {
                Product::new(i.to_string(), format!("Course {i:02}"), Price::new(i * 100_000))
                    .with_rating(3.0 + (i % 3) as f64 * 0.5)
            })
            .collect();
        let catalog = Arc::new(Catalog::new(products).unwrap());
        CatalogBrowser::new(catalog, &BrowseConfig::default())
    }

    #[test]
    fn test_default_view() {
        let browser = browser(20);
        let page = browser.current_page();
        assert_eq!(page.len(), 9);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].name, "Course 01");
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut browser = browser(20);
        assert_eq!(browser.set_page(3), 3);

        browser.update_filters(CriteriaPatch::new().price_range(PriceRange::Low));
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.result_count(), 4);

        browser.set_page(2);
        browser.reset_filters();
        assert_eq!(browser.page(), 1);
        assert!(browser.criteria().is_unfiltered());
    }

    #[test]
    fn test_sort_change_resets_page() {
        let mut browser = browser(20);
        browser.set_page(2);
        browser.top_rated();
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.sort(), (SortKey::Rating, SortOrder::Desc));
        assert_eq!(browser.current_page().items[0].rating, 4.0);
    }

    #[test]
    fn test_toggle_sort_flips_order() {
        let mut browser = browser(3);
        browser.toggle_sort(SortKey::Name);
        assert_eq!(browser.sort(), (SortKey::Name, SortOrder::Desc));
        browser.toggle_sort(SortKey::Price);
        assert_eq!(browser.sort(), (SortKey::Price, SortOrder::Asc));
    }

    #[test]
    fn test_set_page_clamps() {
        let mut browser = browser(20);
        assert_eq!(browser.set_page(99), 3);
        assert_eq!(browser.set_page(0), 1);

        browser.update_filters(CriteriaPatch::new().search_term("nothing matches"));
        assert_eq!(browser.set_page(5), 1);
        assert!(browser.current_page().is_empty());
    }
}
