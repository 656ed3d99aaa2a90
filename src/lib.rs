//! # Bookstand
//!
//! Concurrent in-memory book inventory engine with pluggable locking
//! strategies.
//!
//! Many callers simultaneously read, purchase, restock, and rate items;
//! multi-item operations apply atomically and the locking discipline is
//! deadlock-free by construction (per-item locks are always acquired in
//! ascending id order).
//!
//! ## Quick Start
//!
//! ```
//! use bookstand::prelude::*;
//!
//! let store = Bookstand::builder()
//!     .locking(LockingMode::TwoLevel)
//!     .build();
//!
//! store.add_items(vec![ItemRecord::new(
//!     ItemId(1),
//!     "The Art of Computer Programming",
//!     "Donald Knuth",
//!     300.0,
//!     10,
//!     true,
//! )])?;
//!
//! store.purchase(&[StockAdjustment::new(1u64, 2)])?;
//! assert_eq!(store.list_all()?[0].copies_in_stock, 8);
//! # Ok::<(), bookstand::Error>(())
//! ```
//!
//! ## Roles
//!
//! The engine is consumed through two traits: [`Storefront`]
//! (purchase/lookup/rate/browse) and [`StockManager`] (add/restock/
//! clear/audit). A [`Bookstand`] value implements both, and clones share
//! the same underlying inventory.
//!
//! ## Locking strategies
//!
//! - [`LockingMode::SingleLock`] serializes everything behind one mutex.
//! - [`LockingMode::TwoLevel`] combines a store-level read/write lock for
//!   structural changes with per-item locks for counter mutations, so
//!   operations on disjoint items run concurrently.

#![warn(missing_docs)]

mod store;

pub mod prelude;

pub use store::{Bookstand, BookstandBuilder, LockingMode};

// Re-export the operation surface and core types
pub use bookstand_core::{
    InventoryError as Error, ItemId, ItemRating, ItemRecord, Result, StockAdjustment,
};
pub use bookstand_engine::{InventoryApi, InventoryControl, StockManager, Storefront};
pub use bookstand_store::{InventoryTable, SingleLockTable, TwoLevelTable};
