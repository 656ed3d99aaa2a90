//! Item records and the request types that reference them.
//!
//! An [`ItemRecord`] is one inventory entry: immutable identity and
//! descriptive fields plus mutable stock/rating counters. Records are
//! owned exclusively by the inventory table; callers only ever see clones.

use serde::{Deserialize, Serialize};

/// Maximum rating score a single rating may carry (scores are 0..=MAX).
pub const MAX_RATING_SCORE: u8 = 5;

/// Unique positive integer identity of an inventory item.
///
/// Zero is never a valid identity; API entry points reject it with
/// `InvalidIdentity` before touching any lock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Whether this id is a legal identity (positive).
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        ItemId(raw)
    }
}

/// One inventory item: identity, descriptive fields, and counters.
///
/// `id`, `title`, `author`, `price`, and `is_featured` are immutable once
/// the record is in the table. The four counters are mutated in place by
/// engine operations, always under the table's locking discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Unique identity, immutable.
    pub id: ItemId,
    /// Title, immutable.
    pub title: String,
    /// Author, immutable.
    pub author: String,
    /// Non-negative unit price, immutable.
    pub price: f64,
    /// Copies currently on the shelf. Never goes negative.
    pub copies_in_stock: u64,
    /// Failed purchase attempts recorded against this item.
    pub sale_misses: u64,
    /// Exact sum of every rating score ever applied.
    pub total_rating_score: u64,
    /// Number of ratings applied.
    pub rating_count: u64,
    /// Editor's pick flag, immutable.
    pub is_featured: bool,
}

impl ItemRecord {
    /// Create a fresh record with zeroed miss/rating counters.
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
        copies_in_stock: u64,
        is_featured: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            price,
            copies_in_stock,
            sale_misses: 0,
            total_rating_score: 0,
            rating_count: 0,
            is_featured,
        }
    }

    /// Average rating, or `None` if the item has never been rated.
    pub fn average_rating(&self) -> Option<f64> {
        if self.rating_count == 0 {
            None
        } else {
            Some(self.total_rating_score as f64 / self.rating_count as f64)
        }
    }
}

/// One entry of a purchase or restock request: an item and a copy count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Target item.
    pub id: ItemId,
    /// Number of copies to buy or add. Must be at least 1.
    pub quantity: u64,
}

impl StockAdjustment {
    /// Convenience constructor.
    pub fn new(id: impl Into<ItemId>, quantity: u64) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// One entry of a rating request: an item and an integer score in 0..=5.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRating {
    /// Target item.
    pub id: ItemId,
    /// Score, valid range 0..=[`MAX_RATING_SCORE`].
    pub score: u8,
}

impl ItemRating {
    /// Convenience constructor.
    pub fn new(id: impl Into<ItemId>, score: u8) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_validity() {
        assert!(ItemId(1).is_valid());
        assert!(ItemId(u64::MAX).is_valid());
        assert!(!ItemId(0).is_valid());
    }

    #[test]
    fn test_new_record_zeroes_counters() {
        let rec = ItemRecord::new(ItemId(7), "Title", "Author", 9.5, 42, true);
        assert_eq!(rec.copies_in_stock, 42);
        assert_eq!(rec.sale_misses, 0);
        assert_eq!(rec.total_rating_score, 0);
        assert_eq!(rec.rating_count, 0);
        assert!(rec.is_featured);
    }

    #[test]
    fn test_average_rating_unrated() {
        let rec = ItemRecord::new(ItemId(1), "T", "A", 1.0, 0, false);
        assert_eq!(rec.average_rating(), None);
    }

    #[test]
    fn test_average_rating() {
        let mut rec = ItemRecord::new(ItemId(1), "T", "A", 1.0, 0, false);
        for score in [5u64, 4, 3, 5] {
            rec.total_rating_score += score;
            rec.rating_count += 1;
        }
        assert_eq!(rec.total_rating_score, 17);
        assert_eq!(rec.rating_count, 4);
        assert_eq!(rec.average_rating(), Some(4.25));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let rec = ItemRecord::new(ItemId(3), "Title", "Author", 19.99, 10, false);
        let json = serde_json::to_string(&rec).unwrap();
        let back: ItemRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }

    #[test]
    fn test_item_id_serde_transparent() {
        let json = serde_json::to_string(&ItemId(12)).unwrap();
        assert_eq!(json, "12");
    }
}
