//! The inventory table contract shared by both locking strategies.

use bookstand_core::{InventoryError, ItemId, ItemRecord, Result};

/// Outcome of a guarded multi-item update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Every record passed its check and `apply` ran on each one.
    Applied,
    /// `check` failed for the listed ids. `on_reject` (if given) ran on
    /// every record in the set, `apply` ran on none.
    Rejected(Vec<ItemId>),
}

/// Authoritative `id -> ItemRecord` mapping plus a locking discipline.
///
/// Contract, common to every implementation:
///
/// - Structural changes ([`insert_all`](Self::insert_all),
///   [`remove_all`](Self::remove_all)) are serialized against everything.
/// - [`snapshot`](Self::snapshot) is a consistent point-in-time copy: it
///   never reflects part of an in-flight multi-item mutation.
/// - [`read_set`](Self::read_set) and [`update_set`](Self::update_set)
///   treat their id set as one unit. All locks for the set are held
///   simultaneously; two operations with overlapping sets serialize on
///   the shared items, never interleave per item.
/// - For `read_set` and `update_set` the caller passes ids sorted
///   ascending with no duplicates. Ascending order is the deadlock
///   avoidance invariant: every operation acquires per-item locks in the
///   same global order, so no cyclic wait can form.
pub trait InventoryTable: Send + Sync {
    /// Insert every record, or none. Ids already present cause
    /// `DuplicateIdentity` listing them, and nothing is applied.
    fn insert_all(&self, records: Vec<ItemRecord>) -> Result<()>;

    /// Remove every record unconditionally.
    fn remove_all(&self);

    /// Consistent point-in-time copy of all records, ascending by id.
    fn snapshot(&self) -> Vec<ItemRecord>;

    /// Copies of the records for exactly `ids` (in the given order).
    /// Any absent id fails the whole read with `UnknownIdentity` listing
    /// the missing ids.
    fn read_set(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>>;

    /// Guarded all-or-nothing update over `ids`.
    ///
    /// Locks the full set, runs `check` on every record, then either runs
    /// `apply` on every record (all checks passed) or runs `on_reject` on
    /// every record and reports the failing ids. Unknown ids fail with
    /// `UnknownIdentity` before any lock beyond the lookup is taken and
    /// before any mutation.
    fn update_set(
        &self,
        ids: &[ItemId],
        check: &dyn Fn(&ItemRecord) -> bool,
        apply: &mut dyn FnMut(&mut ItemRecord),
        on_reject: Option<&mut dyn FnMut(&mut ItemRecord)>,
    ) -> Result<UpdateOutcome>;
}

/// Ids in `records` already present per `exists`, sorted ascending.
pub(crate) fn duplicate_ids(
    records: &[ItemRecord],
    mut exists: impl FnMut(ItemId) -> bool,
) -> Vec<ItemId> {
    let mut dups: Vec<ItemId> = records
        .iter()
        .map(|r| r.id)
        .filter(|id| exists(*id))
        .collect();
    dups.sort_unstable();
    dups.dedup();
    dups
}

/// Build the standard unknown-id error from a sorted missing list.
pub(crate) fn unknown(missing: Vec<ItemId>) -> InventoryError {
    InventoryError::UnknownIdentity(missing)
}

#[cfg(debug_assertions)]
pub(crate) fn assert_sorted_unique(ids: &[ItemId]) {
    debug_assert!(
        ids.windows(2).all(|w| w[0] < w[1]),
        "id set must be sorted ascending and free of duplicates"
    );
}

#[cfg(not(debug_assertions))]
pub(crate) fn assert_sorted_unique(_ids: &[ItemId]) {}
