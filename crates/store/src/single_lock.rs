//! Single global lock strategy.
//!
//! One mutex guards the entire table. Every operation, read or write,
//! holds it exclusively for its whole duration, so all the contract's
//! atomicity guarantees fall out of full serialization. Throughput does
//! not scale with independent items; that is the two-level strategy's job.

use bookstand_core::{InventoryError, ItemId, ItemRecord, Result};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::table::{self, InventoryTable, UpdateOutcome};

/// Inventory table serialized by one global mutex.
pub struct SingleLockTable {
    items: Mutex<FxHashMap<ItemId, ItemRecord>>,
}

impl SingleLockTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl Default for SingleLockTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SingleLockTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleLockTable")
            .field("len", &self.len())
            .finish()
    }
}

impl InventoryTable for SingleLockTable {
    fn insert_all(&self, records: Vec<ItemRecord>) -> Result<()> {
        let mut items = self.items.lock();
        let dups = table::duplicate_ids(&records, |id| items.contains_key(&id));
        if !dups.is_empty() {
            tracing::debug!(ids = ?dups, "insert rejected: duplicate identities");
            return Err(InventoryError::DuplicateIdentity(dups));
        }
        for record in records {
            items.insert(record.id, record);
        }
        Ok(())
    }

    fn remove_all(&self) {
        self.items.lock().clear();
    }

    fn snapshot(&self) -> Vec<ItemRecord> {
        let items = self.items.lock();
        let mut all: Vec<ItemRecord> = items.values().cloned().collect();
        all.sort_unstable_by_key(|r| r.id);
        all
    }

    fn read_set(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>> {
        table::assert_sorted_unique(ids);
        let items = self.items.lock();
        let missing: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| !items.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(table::unknown(missing));
        }
        Ok(ids.iter().map(|id| items[id].clone()).collect())
    }

    fn update_set(
        &self,
        ids: &[ItemId],
        check: &dyn Fn(&ItemRecord) -> bool,
        apply: &mut dyn FnMut(&mut ItemRecord),
        on_reject: Option<&mut dyn FnMut(&mut ItemRecord)>,
    ) -> Result<UpdateOutcome> {
        table::assert_sorted_unique(ids);
        let mut items = self.items.lock();

        let missing: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| !items.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(table::unknown(missing));
        }

        let rejected: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| !check(&items[id]))
            .collect();

        if !rejected.is_empty() {
            if let Some(on_reject) = on_reject {
                for id in ids {
                    if let Some(rec) = items.get_mut(id) {
                        on_reject(rec);
                    }
                }
            }
            return Ok(UpdateOutcome::Rejected(rejected));
        }

        for id in ids {
            if let Some(rec) = items.get_mut(id) {
                apply(rec);
            }
        }
        Ok(UpdateOutcome::Applied)
    }
}
