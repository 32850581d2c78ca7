//! Error types for the session layer.

use edu_catalog::CatalogError;
use thiserror::Error;

/// Errors surfaced to the presentation layer.
///
/// The request failures carry the user-facing messages verbatim.
#[derive(Error, Debug)]
pub enum MarketError {
    /// The simulated suggestion request failed.
    #[error("Không thể lấy gợi ý lúc này. Vui lòng thử lại sau.")]
    SuggestionsUnavailable,

    /// The simulated chat request failed.
    #[error("Không thể gửi tin nhắn")]
    ChatUnavailable,

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
