//! Workload workers: configured interaction mixes run against the engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bookstand_core::{ItemId, StockAdjustment};
use bookstand_engine::InventoryApi;
use serde::{Deserialize, Serialize};

use crate::generator::ItemSetGenerator;

/// Mix and sizing knobs for one worker.
///
/// The three interaction kinds are chosen per run by a uniform roll in
/// `[0, 100)`: rolls below `percent_rare_stock` run the stock acquisition
/// interaction, the next `percent_frequent_stock` points run the restock
/// interaction, and the remainder runs the customer purchase interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Share of runs performing new stock acquisition.
    pub percent_rare_stock: f32,
    /// Share of runs performing restocking of the least-stocked items.
    pub percent_frequent_stock: f32,
    /// Unmeasured runs executed first to warm caches and stock levels.
    pub warm_up_runs: u64,
    /// Measured runs.
    pub measured_runs: u64,
    /// Records generated per stock acquisition interaction.
    pub items_per_acquisition: usize,
    /// How many of the least-stocked items a restock interaction tops up.
    pub least_stocked_count: usize,
    /// Copies added per restocked item.
    pub restock_copies: u64,
    /// Editor's picks fetched by a customer interaction.
    pub featured_count: usize,
    /// Items bought per customer interaction (sampled from the picks).
    pub items_per_purchase: usize,
    /// Copies bought per item.
    pub copies_per_purchase: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            percent_rare_stock: 10.0,
            percent_frequent_stock: 30.0,
            warm_up_runs: 100,
            measured_runs: 500,
            items_per_acquisition: 5,
            least_stocked_count: 5,
            restock_copies: 10,
            featured_count: 5,
            items_per_purchase: 2,
            copies_per_purchase: 1,
        }
    }
}

/// What one worker observed during its measured phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRunResult {
    /// Interactions that completed without an engine error.
    pub successful_interactions: u64,
    /// All measured interactions.
    pub total_runs: u64,
    /// Wall time of the measured phase.
    pub elapsed: Duration,
    /// Successful customer (purchase) interactions.
    pub successful_customer_interactions: u64,
    /// Attempted customer interactions.
    pub total_customer_interactions: u64,
}

impl WorkerRunResult {
    /// Successful interactions per second over the measured phase.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.successful_interactions as f64 / secs
        }
    }
}

/// One synthetic caller. Owns its generator and RNG; shares the engine.
pub struct Worker<E: InventoryApi> {
    engine: Arc<E>,
    config: WorkloadConfig,
    generator: ItemSetGenerator,
}

impl<E: InventoryApi> Worker<E> {
    /// Worker with an entropy-seeded generator.
    pub fn new(engine: Arc<E>, config: WorkloadConfig) -> Self {
        Self {
            engine,
            config,
            generator: ItemSetGenerator::new(),
        }
    }

    /// Worker with a deterministic generator, for reproducible runs.
    pub fn with_seed(engine: Arc<E>, config: WorkloadConfig, seed: u64) -> Self {
        Self {
            engine,
            config,
            generator: ItemSetGenerator::with_seed(seed),
        }
    }

    /// Run warm-up then the measured phase; report the measured phase.
    pub fn run(mut self) -> WorkerRunResult {
        for _ in 0..self.config.warm_up_runs {
            let _ = self.run_one();
        }

        let mut successful = 0u64;
        let mut customer_total = 0u64;
        let mut customer_ok = 0u64;

        let start = Instant::now();
        for _ in 0..self.config.measured_runs {
            let (ok, was_customer) = self.run_one();
            if ok {
                successful += 1;
            }
            if was_customer {
                customer_total += 1;
                if ok {
                    customer_ok += 1;
                }
            }
        }
        let elapsed = start.elapsed();
        tracing::debug!(
            successful,
            total = self.config.measured_runs,
            ?elapsed,
            "worker finished measured phase"
        );

        WorkerRunResult {
            successful_interactions: successful,
            total_runs: self.config.measured_runs,
            elapsed,
            successful_customer_interactions: customer_ok,
            total_customer_interactions: customer_total,
        }
    }

    /// Run one interaction; returns (succeeded, was customer interaction).
    fn run_one(&mut self) -> (bool, bool) {
        let roll = self.generator.percent_roll();
        if roll < self.config.percent_rare_stock {
            (self.acquire_new_stock().is_ok(), false)
        } else if roll < self.config.percent_rare_stock + self.config.percent_frequent_stock {
            (self.restock_least_stocked().is_ok(), false)
        } else {
            (self.customer_purchase().is_ok(), true)
        }
    }

    /// Rare interaction: generate records and add the ones not in stock.
    fn acquire_new_stock(&mut self) -> bookstand_core::Result<()> {
        let existing: Vec<ItemId> = self
            .engine
            .list_all()?
            .iter()
            .map(|r| r.id)
            .collect();
        let candidates = self.generator.next_stock_set(self.config.items_per_acquisition);
        let missing: Vec<_> = candidates
            .into_iter()
            .filter(|r| !existing.contains(&r.id))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        self.engine.add_items(missing)
    }

    /// Frequent stock interaction: top up the least-stocked items.
    fn restock_least_stocked(&mut self) -> bookstand_core::Result<()> {
        let mut all = self.engine.list_all()?;
        if all.is_empty() {
            return Ok(());
        }
        all.sort_unstable_by_key(|r| r.copies_in_stock);
        let requests: Vec<StockAdjustment> = all
            .iter()
            .take(self.config.least_stocked_count)
            .map(|r| StockAdjustment::new(r.id, self.config.restock_copies))
            .collect();
        self.engine.restock(&requests)
    }

    /// Frequent customer interaction: browse the editor's picks and buy a
    /// sample of them. Failures (e.g. a pick just sold out) count against
    /// the customer success rate.
    fn customer_purchase(&mut self) -> bookstand_core::Result<()> {
        let picks = self.engine.featured(self.config.featured_count)?;
        let pool: Vec<ItemId> = picks.iter().map(|r| r.id).collect();
        let chosen = self
            .generator
            .sample_ids(&pool, self.config.items_per_purchase);
        let requests: Vec<StockAdjustment> = chosen
            .into_iter()
            .map(|id| StockAdjustment::new(id, self.config.copies_per_purchase))
            .collect();
        self.engine.purchase(&requests)
    }
}
