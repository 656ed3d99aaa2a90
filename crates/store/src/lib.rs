//! Inventory table and locking strategies.
//!
//! The table is the only legal path to the `id -> ItemRecord` mapping.
//! Two interchangeable implementations satisfy the same [`InventoryTable`]
//! contract:
//!
//! - [`SingleLockTable`]: one mutex over the whole table. Every operation
//!   is serialized. Simple, always correct.
//! - [`TwoLevelTable`]: a store-level read/write lock for structural
//!   changes plus one exclusive lock per record for counter mutations,
//!   acquired in ascending id order. Operations on disjoint item sets run
//!   concurrently.
//!
//! The engine layer owns validation and counter arithmetic; this crate
//! owns locking. All lock acquisition for a multi-item operation happens
//! before any mutation, so a failed operation never leaves a partial
//! state behind.

pub mod single_lock;
pub mod table;
pub mod two_level;

pub use single_lock::SingleLockTable;
pub use table::{InventoryTable, UpdateOutcome};
pub use two_level::TwoLevelTable;
