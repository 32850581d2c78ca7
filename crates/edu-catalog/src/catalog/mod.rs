//! Product catalog module.
//!
//! The catalog is an immutable snapshot loaded once per session. Every other
//! component only reads from it.

mod product;

pub use product::{Level, Product};

use crate::error::CatalogError;
use crate::ids::ProductId;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Immutable catalog snapshot with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.to_string()));
            }
        }
        debug!(products = products.len(), "catalog loaded");
        Ok(Self { products, index })
    }

    /// Parse a JSON array of product records.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in load order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect()
    }

    /// Distinct levels present, in ascending difficulty.
    pub fn levels(&self) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .filter(|level| self.products.iter().any(|p| p.level == *level))
            .collect()
    }
}

/// Products whose id is in `ids`, preserving catalog order.
///
/// Ids that do not exist in the catalog are skipped silently.
pub fn select_by_ids<'a, I>(products: &'a [Product], ids: &HashSet<I>) -> Vec<&'a Product>
where
    I: std::borrow::Borrow<str> + std::hash::Hash + Eq,
{
    products
        .iter()
        .filter(|p| ids.contains(p.id.as_str()))
        .collect()
}
