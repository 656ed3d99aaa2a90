//! Random inventory data for workload runs.

use bookstand_core::{ItemId, ItemRecord};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Id space the generator draws from. Kept small enough that repeated
/// acquisition interactions collide with existing stock now and then,
/// which is what exercises the duplicate-filtering path in workers.
const ID_SPACE: u64 = 1_000_000;

/// Produces random, unique item sets and id samples.
pub struct ItemSetGenerator {
    rng: StdRng,
}

impl ItemSetGenerator {
    /// Generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn random_text(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    /// `count` fresh records with distinct random ids, random descriptive
    /// fields, and stock in a plausible range.
    pub fn next_stock_set(&mut self, count: usize) -> Vec<ItemRecord> {
        // BTreeSet keeps the output order a function of the seed alone.
        let mut ids: BTreeSet<u64> = BTreeSet::new();
        while ids.len() < count {
            ids.insert(self.rng.gen_range(1..=ID_SPACE));
        }
        ids.into_iter()
            .map(|id| {
                let title = self.random_text(12);
                let author = self.random_text(8);
                let price = self.rng.gen_range(5.0..150.0);
                let copies = self.rng.gen_range(5..100);
                let featured = self.rng.gen_bool(0.1);
                ItemRecord::new(ItemId(id), title, author, price, copies, featured)
            })
            .collect()
    }

    /// Up to `count` ids sampled without replacement from `pool`.
    pub fn sample_ids(&mut self, pool: &[ItemId], count: usize) -> Vec<ItemId> {
        pool.choose_multiple(&mut self.rng, count).copied().collect()
    }

    /// Uniform roll in `[0, 100)`, used to pick an interaction.
    pub fn percent_roll(&mut self) -> f32 {
        self.rng.gen_range(0.0..100.0)
    }
}

impl Default for ItemSetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_stock_set_has_unique_valid_ids() {
        let mut gen = ItemSetGenerator::with_seed(7);
        let set = gen.next_stock_set(50);
        assert_eq!(set.len(), 50);
        let ids: HashSet<ItemId> = set.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 50);
        assert!(set.iter().all(|r| r.id.is_valid()));
        assert!(set.iter().all(|r| r.price >= 0.0));
        assert!(set.iter().all(|r| !r.title.is_empty() && !r.author.is_empty()));
    }

    #[test]
    fn test_sampling_is_without_replacement() {
        let mut gen = ItemSetGenerator::with_seed(7);
        let pool: Vec<ItemId> = (1..=10).map(ItemId).collect();
        let sample = gen.sample_ids(&pool, 4);
        assert_eq!(sample.len(), 4);
        let distinct: HashSet<ItemId> = sample.iter().copied().collect();
        assert_eq!(distinct.len(), 4);

        // Asking for more than the pool holds returns the whole pool.
        assert_eq!(gen.sample_ids(&pool, 100).len(), 10);
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let a: Vec<ItemId> = ItemSetGenerator::with_seed(42)
            .next_stock_set(20)
            .iter()
            .map(|r| r.id)
            .collect();
        let b: Vec<ItemId> = ItemSetGenerator::with_seed(42)
            .next_stock_set(20)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(a, b);
    }
}
