//! The two caller-facing roles of the engine.
//!
//! A remote exposure layer maps each method to exactly one round trip;
//! splitting one method over several calls would break the atomicity
//! contract, so none of these methods take continuation state.

use bookstand_core::{ItemId, ItemRating, ItemRecord, Result, StockAdjustment};

/// Read/purchase-oriented interface: what a customer-facing caller uses.
pub trait Storefront {
    /// Buy copies of each requested item, atomically across the set.
    ///
    /// Fails with `InsufficientStock` naming the items whose stock is
    /// short; in that case every requested item's sale-miss counter is
    /// incremented together with the failure and no stock changes.
    fn purchase(&self, requests: &[StockAdjustment]) -> Result<()>;

    /// Records for exactly the given ids.
    fn lookup_by_ids(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>>;

    /// Apply one rating per entry, atomically across the set.
    fn rate(&self, ratings: &[ItemRating]) -> Result<()>;

    /// Up to `n` rated items, descending average rating, ties broken by
    /// ascending id. Items never rated are excluded.
    fn top_rated(&self, n: usize) -> Result<Vec<ItemRecord>>;

    /// Up to `n` editor's picks, ascending id.
    fn featured(&self, n: usize) -> Result<Vec<ItemRecord>>;
}

/// Stock-management interface: what an inventory administrator uses.
pub trait StockManager {
    /// Insert all records, or none on any duplicate identity.
    fn add_items(&self, records: Vec<ItemRecord>) -> Result<()>;

    /// Clear the whole table. Always succeeds.
    fn remove_all_items(&self) -> Result<()>;

    /// Add copies to each named item, atomically across the set.
    fn restock(&self, requests: &[StockAdjustment]) -> Result<()>;

    /// Consistent snapshot of every record, ascending id.
    fn list_all(&self) -> Result<Vec<ItemRecord>>;

    /// Items that have recorded at least one sale miss, ascending id.
    fn low_stock(&self) -> Result<Vec<ItemRecord>>;
}

/// Both roles plus the bounds needed to share an engine across threads.
///
/// Blanket-implemented; used by the facade to erase the locking strategy
/// behind a trait object.
pub trait InventoryApi: Storefront + StockManager + Send + Sync {}

impl<T: Storefront + StockManager + Send + Sync> InventoryApi for T {}
