//! Core types for the bookstand inventory engine.
//!
//! This crate holds the item data model and the error taxonomy shared by
//! every layer: the inventory table, the control engine, the facade, and
//! the workload driver. It has no locking or engine logic of its own.

pub mod error;
pub mod item;

pub use error::{InventoryError, Result};
pub use item::{ItemId, ItemRating, ItemRecord, StockAdjustment};
