//! Search module.
//!
//! Contains filter criteria, sorting and pagination over catalog slices.
//! Every function here is pure: inputs are borrowed, outputs are new vectors.

mod filter;
mod results;
mod sort;

pub use filter::{filter_products, CriteriaPatch, FilterCriteria, PriceRange};
pub use results::{paginate, Page, Pagination};
pub use sort::{sort_products, SortKey, SortOrder};
