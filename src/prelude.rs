//! Convenience re-exports for the common case.
//!
//! ```
//! use bookstand::prelude::*;
//! ```

pub use crate::{
    Bookstand, BookstandBuilder, Error, ItemId, ItemRating, ItemRecord, LockingMode, Result,
    StockAdjustment, StockManager, Storefront,
};
