//! Inventory control engine.
//!
//! [`InventoryControl`] is the public operation set built on top of an
//! [`bookstand_store::InventoryTable`]. It owns all input validation and
//! all counter arithmetic; the table underneath owns the locking.
//!
//! The engine is exposed through two role traits mirroring the two kinds
//! of caller: [`Storefront`] for read/purchase traffic and
//! [`StockManager`] for stock administration. One engine value implements
//! both.

pub mod control;
pub mod roles;

pub use control::InventoryControl;
pub use roles::{InventoryApi, StockManager, Storefront};
