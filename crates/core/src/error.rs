//! Error taxonomy for inventory operations.
//!
//! Every engine operation validates its full input before acquiring any
//! mutation lock; on failure the operation is a no-op and one of these
//! errors is returned. The single sanctioned failure side effect is the
//! `sale_misses` increment accompanying [`InventoryError::InsufficientStock`].

use crate::item::ItemId;
use thiserror::Error;

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// All errors an inventory operation can return.
///
/// Variants that concern specific items carry the offending ids, sorted
/// ascending, so callers and wire layers can report them precisely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Malformed input: empty request set, zero quantity or count,
    /// duplicate id within one request, blank descriptive field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Non-positive item id referenced by a request.
    #[error("invalid item id(s): {}", join_ids(.0))]
    InvalidIdentity(Vec<ItemId>),

    /// Attempt to add an item whose id already exists.
    #[error("duplicate item id(s): {}", join_ids(.0))]
    DuplicateIdentity(Vec<ItemId>),

    /// Reference to an id not present in the table.
    #[error("unknown item id(s): {}", join_ids(.0))]
    UnknownIdentity(Vec<ItemId>),

    /// Purchase asked for more copies than an item has in stock.
    #[error("insufficient stock for item(s): {}", join_ids(.0))]
    InsufficientStock(Vec<ItemId>),

    /// Rating score outside the valid 0..=5 range.
    #[error("invalid rating score for item(s): {}", join_ids(.0))]
    InvalidRating(Vec<ItemId>),
}

impl InventoryError {
    /// Stable code for wire encoding. These strings are frozen.
    pub fn error_code(&self) -> &'static str {
        match self {
            InventoryError::InvalidRequest(_) => "InvalidRequest",
            InventoryError::InvalidIdentity(_) => "InvalidIdentity",
            InventoryError::DuplicateIdentity(_) => "DuplicateIdentity",
            InventoryError::UnknownIdentity(_) => "UnknownIdentity",
            InventoryError::InsufficientStock(_) => "InsufficientStock",
            InventoryError::InvalidRating(_) => "InvalidRating",
        }
    }

    /// Ids the error concerns, if any.
    pub fn offending_ids(&self) -> &[ItemId] {
        match self {
            InventoryError::InvalidRequest(_) => &[],
            InventoryError::InvalidIdentity(ids)
            | InventoryError::DuplicateIdentity(ids)
            | InventoryError::UnknownIdentity(ids)
            | InventoryError::InsufficientStock(ids)
            | InventoryError::InvalidRating(ids) => ids,
        }
    }

    /// Whether this error reports a stock shortfall (the only failure
    /// that mutates state, by incrementing sale-miss counters).
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, InventoryError::InsufficientStock(_))
    }
}
