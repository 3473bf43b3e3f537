use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A listing field failed validation at staging or insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("listing name must not be empty")]
    EmptyName,
    #[error("price {price} is below the minimum of {floor}")]
    PriceBelowFloor { price: u64, floor: u64 },
}

/// A generation collaborator failed or produced nothing usable.
///
/// Never fatal: the listing pipeline records it as a notice and falls back.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GenerationError {
    #[error("content generation is disabled")]
    Disabled,
    #[error("generation request failed: {0}")]
    Request(String),
    #[error("generator returned unusable output: {0}")]
    Unusable(String),
}

/// Errors surfaced by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid argument: limit must be positive, got {limit}")]
    InvalidArgument { limit: i64 },
}
