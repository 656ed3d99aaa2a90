//! Main entry point: the `Bookstand` facade and its builder.

use std::sync::Arc;

use bookstand_core::{ItemId, ItemRating, ItemRecord, Result, StockAdjustment};
use bookstand_engine::{InventoryApi, InventoryControl, StockManager, Storefront};
use bookstand_store::{SingleLockTable, TwoLevelTable};

/// Which locking strategy backs the inventory table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LockingMode {
    /// One global mutex; every operation serialized. Always correct,
    /// useful as a baseline and under very low contention.
    SingleLock,
    /// Store-level rwlock plus per-item locks; disjoint-item operations
    /// proceed concurrently. The default.
    #[default]
    TwoLevel,
}

/// A handle to one in-memory inventory.
///
/// Cheap to clone; clones share the same table. Implements both role
/// traits, so it can be handed to purchase-side and stock-side callers
/// alike.
///
/// # Example
///
/// ```
/// use bookstand::prelude::*;
///
/// let store = Bookstand::new();
/// store.add_items(vec![ItemRecord::new(ItemId(1), "T", "A", 9.0, 3, false)])?;
/// let records = store.lookup_by_ids(&[ItemId(1)])?;
/// assert_eq!(records[0].copies_in_stock, 3);
/// # Ok::<(), bookstand::Error>(())
/// ```
#[derive(Clone)]
pub struct Bookstand {
    inner: Arc<dyn InventoryApi>,
    mode: LockingMode,
}

impl Bookstand {
    /// Inventory with the default (two-level) locking strategy.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring an inventory.
    pub fn builder() -> BookstandBuilder {
        BookstandBuilder::default()
    }

    /// The locking strategy this inventory was built with.
    pub fn locking_mode(&self) -> LockingMode {
        self.mode
    }
}

impl Default for Bookstand {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bookstand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bookstand").field("mode", &self.mode).finish()
    }
}

impl Storefront for Bookstand {
    fn purchase(&self, requests: &[StockAdjustment]) -> Result<()> {
        self.inner.purchase(requests)
    }

    fn lookup_by_ids(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>> {
        self.inner.lookup_by_ids(ids)
    }

    fn rate(&self, ratings: &[ItemRating]) -> Result<()> {
        self.inner.rate(ratings)
    }

    fn top_rated(&self, n: usize) -> Result<Vec<ItemRecord>> {
        self.inner.top_rated(n)
    }

    fn featured(&self, n: usize) -> Result<Vec<ItemRecord>> {
        self.inner.featured(n)
    }
}

impl StockManager for Bookstand {
    fn add_items(&self, records: Vec<ItemRecord>) -> Result<()> {
        self.inner.add_items(records)
    }

    fn remove_all_items(&self) -> Result<()> {
        self.inner.remove_all_items()
    }

    fn restock(&self, requests: &[StockAdjustment]) -> Result<()> {
        self.inner.restock(requests)
    }

    fn list_all(&self) -> Result<Vec<ItemRecord>> {
        self.inner.list_all()
    }

    fn low_stock(&self) -> Result<Vec<ItemRecord>> {
        self.inner.low_stock()
    }
}

/// Builder for [`Bookstand`].
#[derive(Debug, Default)]
pub struct BookstandBuilder {
    mode: LockingMode,
}

impl BookstandBuilder {
    /// Choose the locking strategy.
    pub fn locking(mut self, mode: LockingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the inventory. Infallible: there is no I/O to fail.
    pub fn build(self) -> Bookstand {
        let inner: Arc<dyn InventoryApi> = match self.mode {
            LockingMode::SingleLock => Arc::new(InventoryControl::new(SingleLockTable::new())),
            LockingMode::TwoLevel => Arc::new(InventoryControl::new(TwoLevelTable::new())),
        };
        tracing::debug!(mode = ?self.mode, "inventory created");
        Bookstand {
            inner,
            mode: self.mode,
        }
    }
}
