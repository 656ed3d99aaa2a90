//! The engine's operation set.
//!
//! Every operation validates its complete input before the table takes
//! any lock for mutation; a validation failure is a strict no-op. The one
//! sanctioned side effect on a failure path is the sale-miss increment
//! that accompanies `InsufficientStock`, applied by the table atomically
//! with the rejection.

use bookstand_core::item::MAX_RATING_SCORE;
use bookstand_core::{InventoryError, ItemId, ItemRating, ItemRecord, Result, StockAdjustment};
use bookstand_store::{InventoryTable, UpdateOutcome};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type IdSet = SmallVec<[ItemId; 8]>;

/// The inventory control engine, generic over the locking strategy.
pub struct InventoryControl<T: InventoryTable> {
    table: T,
}

impl<T: InventoryTable> InventoryControl<T> {
    /// Build an engine over the given table.
    pub fn new(table: T) -> Self {
        Self { table }
    }

    /// Direct access to the underlying table (single-item reads, tests).
    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T: InventoryTable + std::fmt::Debug> std::fmt::Debug for InventoryControl<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryControl")
            .field("table", &self.table)
            .finish()
    }
}

fn empty_request() -> InventoryError {
    InventoryError::InvalidRequest("request set is empty".into())
}

/// Non-positive ids among `ids`, sorted and deduplicated.
fn invalid_ids(ids: impl Iterator<Item = ItemId>) -> Vec<ItemId> {
    let mut bad: Vec<ItemId> = ids.filter(|id| !id.is_valid()).collect();
    bad.sort_unstable();
    bad.dedup();
    bad
}

/// Validate a purchase/restock request set and index it by id.
///
/// Checks, in order: non-empty, ids positive, quantities at least 1, no
/// id named twice.
fn validated_quantities(requests: &[StockAdjustment]) -> Result<FxHashMap<ItemId, u64>> {
    if requests.is_empty() {
        return Err(empty_request());
    }
    let bad = invalid_ids(requests.iter().map(|r| r.id));
    if !bad.is_empty() {
        return Err(InventoryError::InvalidIdentity(bad));
    }
    if requests.iter().any(|r| r.quantity == 0) {
        return Err(InventoryError::InvalidRequest(
            "quantity must be at least 1".into(),
        ));
    }
    let mut quantities = FxHashMap::default();
    for r in requests {
        if quantities.insert(r.id, r.quantity).is_some() {
            return Err(InventoryError::InvalidRequest(format!(
                "item {} named more than once in one request",
                r.id
            )));
        }
    }
    Ok(quantities)
}

fn sorted_ids<V>(map: &FxHashMap<ItemId, V>) -> IdSet {
    let mut ids: IdSet = map.keys().copied().collect();
    ids.sort_unstable();
    ids
}

fn validate_limit(n: usize) -> Result<()> {
    if n == 0 {
        return Err(InventoryError::InvalidRequest(
            "result count must be at least 1".into(),
        ));
    }
    Ok(())
}

impl<T: InventoryTable> crate::Storefront for InventoryControl<T> {
    fn purchase(&self, requests: &[StockAdjustment]) -> Result<()> {
        let quantities = validated_quantities(requests)?;
        let ids = sorted_ids(&quantities);

        let outcome = self.table.update_set(
            &ids,
            &|rec| rec.copies_in_stock >= quantities[&rec.id],
            &mut |rec| rec.copies_in_stock -= quantities[&rec.id],
            Some(&mut |rec| rec.sale_misses += 1),
        )?;

        match outcome {
            UpdateOutcome::Applied => {
                tracing::trace!(items = ids.len(), "purchase applied");
                Ok(())
            }
            UpdateOutcome::Rejected(short) => {
                tracing::debug!(ids = ?short, "purchase rejected: insufficient stock");
                Err(InventoryError::InsufficientStock(short))
            }
        }
    }

    fn lookup_by_ids(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>> {
        if ids.is_empty() {
            return Err(empty_request());
        }
        let bad = invalid_ids(ids.iter().copied());
        if !bad.is_empty() {
            return Err(InventoryError::InvalidIdentity(bad));
        }
        let mut sorted: IdSet = ids.iter().copied().collect();
        sorted.sort_unstable();
        sorted.dedup();
        self.table.read_set(&sorted)
    }

    fn rate(&self, ratings: &[ItemRating]) -> Result<()> {
        if ratings.is_empty() {
            return Err(empty_request());
        }
        let bad = invalid_ids(ratings.iter().map(|r| r.id));
        if !bad.is_empty() {
            return Err(InventoryError::InvalidIdentity(bad));
        }
        let mut out_of_range: Vec<ItemId> = ratings
            .iter()
            .filter(|r| r.score > MAX_RATING_SCORE)
            .map(|r| r.id)
            .collect();
        if !out_of_range.is_empty() {
            out_of_range.sort_unstable();
            out_of_range.dedup();
            tracing::debug!(ids = ?out_of_range, "rating rejected: score out of range");
            return Err(InventoryError::InvalidRating(out_of_range));
        }
        let mut scores = FxHashMap::default();
        for r in ratings {
            if scores.insert(r.id, r.score).is_some() {
                return Err(InventoryError::InvalidRequest(format!(
                    "item {} named more than once in one request",
                    r.id
                )));
            }
        }
        let ids = sorted_ids(&scores);

        let outcome = self.table.update_set(
            &ids,
            &|_| true,
            &mut |rec| {
                rec.rating_count += 1;
                rec.total_rating_score += u64::from(scores[&rec.id]);
            },
            None,
        )?;
        debug_assert_eq!(outcome, UpdateOutcome::Applied);
        Ok(())
    }

    fn top_rated(&self, n: usize) -> Result<Vec<ItemRecord>> {
        validate_limit(n)?;
        let mut rated: Vec<ItemRecord> = self
            .table
            .snapshot()
            .into_iter()
            .filter(|r| r.rating_count > 0)
            .collect();
        // Averages compared as cross products: exact, no float rounding.
        rated.sort_unstable_by(|a, b| {
            let lhs = u128::from(a.total_rating_score) * u128::from(b.rating_count);
            let rhs = u128::from(b.total_rating_score) * u128::from(a.rating_count);
            rhs.cmp(&lhs).then_with(|| a.id.cmp(&b.id))
        });
        rated.truncate(n);
        Ok(rated)
    }

    fn featured(&self, n: usize) -> Result<Vec<ItemRecord>> {
        validate_limit(n)?;
        // Snapshot is ascending by id; taking the first n editor's picks
        // is the documented deterministic selection.
        let mut picks: Vec<ItemRecord> = self
            .table
            .snapshot()
            .into_iter()
            .filter(|r| r.is_featured)
            .collect();
        picks.truncate(n);
        Ok(picks)
    }
}

impl<T: InventoryTable> crate::StockManager for InventoryControl<T> {
    fn add_items(&self, records: Vec<ItemRecord>) -> Result<()> {
        if records.is_empty() {
            return Err(empty_request());
        }
        let bad = invalid_ids(records.iter().map(|r| r.id));
        if !bad.is_empty() {
            return Err(InventoryError::InvalidIdentity(bad));
        }
        for r in &records {
            if r.title.trim().is_empty() || r.author.trim().is_empty() {
                return Err(InventoryError::InvalidRequest(format!(
                    "item {} has a blank title or author",
                    r.id
                )));
            }
            if !r.price.is_finite() || r.price < 0.0 {
                return Err(InventoryError::InvalidRequest(format!(
                    "item {} has an invalid price",
                    r.id
                )));
            }
        }
        let mut seen: IdSet = records.iter().map(|r| r.id).collect();
        seen.sort_unstable();
        let mut batch_dups: Vec<ItemId> = seen
            .windows(2)
            .filter(|w| w[0] == w[1])
            .map(|w| w[0])
            .collect();
        if !batch_dups.is_empty() {
            batch_dups.dedup();
            return Err(InventoryError::DuplicateIdentity(batch_dups));
        }

        self.table.insert_all(records)?;
        tracing::trace!("items added");
        Ok(())
    }

    fn remove_all_items(&self) -> Result<()> {
        self.table.remove_all();
        tracing::debug!("inventory cleared");
        Ok(())
    }

    fn restock(&self, requests: &[StockAdjustment]) -> Result<()> {
        let quantities = validated_quantities(requests)?;
        let ids = sorted_ids(&quantities);

        let outcome = self.table.update_set(
            &ids,
            &|_| true,
            &mut |rec| rec.copies_in_stock += quantities[&rec.id],
            None,
        )?;
        debug_assert_eq!(outcome, UpdateOutcome::Applied);
        tracing::trace!(items = ids.len(), "restock applied");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<ItemRecord>> {
        Ok(self.table.snapshot())
    }

    fn low_stock(&self) -> Result<Vec<ItemRecord>> {
        Ok(self
            .table
            .snapshot()
            .into_iter()
            .filter(|r| r.sale_misses > 0)
            .collect())
    }
}
