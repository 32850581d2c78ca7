//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while loading a catalog snapshot.
///
/// Filtering, sorting, pagination and suggestions never fail; only building
/// the snapshot itself can.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The same product id appears more than once in a snapshot.
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Fixture could not be parsed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}
