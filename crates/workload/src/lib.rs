//! Synthetic workload driver for the inventory engine.
//!
//! The driver is an ordinary engine caller: it speaks only the public
//! role traits and has no privileged access to inventory state. A
//! [`Worker`] runs a configured mix of three interactions (rare stock
//! acquisition, frequent restocking, frequent customer purchases) with a
//! warm-up phase followed by a measured phase, and reports durations and
//! success/failure counts for throughput and latency analysis.

pub mod generator;
pub mod metrics;
pub mod worker;

pub use generator::ItemSetGenerator;
pub use metrics::WorkloadReport;
pub use worker::{WorkerRunResult, WorkloadConfig, Worker};
