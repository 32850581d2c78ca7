//! Course catalog domain types and logic for EduMarket.
//!
//! This crate holds everything that can be computed from a catalog snapshot
//! without touching storage:
//!
//! - **Catalog**: Products (courses), levels, prices, the immutable snapshot
//! - **Search**: Filter criteria, sorting, pagination
//! - **Suggest**: Heuristic course suggestions from history and favorites
//!
//! # Example
//!
//! ```rust,ignore
//! use edu_catalog::prelude::*;
//!
//! let catalog = Catalog::from_json_str(include_str!("catalog.json"))?;
//!
//! let criteria = FilterCriteria::default().merge(
//!     CriteriaPatch::new().price_range(PriceRange::Low),
//! );
//! let filtered = filter_products(catalog.products(), &criteria);
//! let sorted = sort_products(&filtered, SortKey::Rating, SortOrder::Desc);
//! let page = paginate(&sorted, 1, 9);
//! println!("{} of {} pages", page.items.len(), page.total_pages);
//! ```

pub mod error;
pub mod ids;
pub mod price;

pub mod catalog;
pub mod search;
pub mod suggest;

pub use error::CatalogError;
pub use ids::ProductId;
pub use price::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::ProductId;
    pub use crate::price::Price;

    // Catalog
    pub use crate::catalog::{select_by_ids, Catalog, Level, Product};

    // Search
    pub use crate::search::{
        filter_products, paginate, sort_products, CriteriaPatch, FilterCriteria, Page, Pagination,
        PriceRange, SortKey, SortOrder,
    };

    // Suggest
    pub use crate::suggest::{suggest, SuggestionPolicy};
}
