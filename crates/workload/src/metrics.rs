//! Aggregation of worker results into a workload report.

use serde::{Deserialize, Serialize};

use crate::worker::WorkerRunResult;

/// Summary of one workload execution across all workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// Number of workers that contributed.
    pub workers: usize,
    /// Measured interactions across all workers.
    pub total_runs: u64,
    /// Interactions that completed without an engine error.
    pub successful_interactions: u64,
    /// Customer interactions that succeeded / were attempted.
    pub successful_customer_interactions: u64,
    /// Attempted customer interactions.
    pub total_customer_interactions: u64,
    /// Sum of per-worker throughputs, successful interactions per second.
    pub aggregated_throughput: f64,
    /// Mean time per successful interaction, in nanoseconds.
    pub average_latency_ns: f64,
}

impl WorkloadReport {
    /// Aggregate the results of a finished worker set.
    pub fn aggregate(results: &[WorkerRunResult]) -> Self {
        let mut total_runs = 0u64;
        let mut successful = 0u64;
        let mut customer_ok = 0u64;
        let mut customer_total = 0u64;
        let mut throughput = 0.0f64;
        let mut latency_sum = 0.0f64;
        let mut latency_samples = 0usize;

        for result in results {
            total_runs += result.total_runs;
            successful += result.successful_interactions;
            customer_ok += result.successful_customer_interactions;
            customer_total += result.total_customer_interactions;

            let t = result.throughput();
            throughput += t;
            if t > 0.0 {
                latency_sum += 1e9 / t;
                latency_samples += 1;
            }
        }

        let average_latency_ns = if latency_samples == 0 {
            0.0
        } else {
            latency_sum / latency_samples as f64
        };

        WorkloadReport {
            workers: results.len(),
            total_runs,
            successful_interactions: successful,
            successful_customer_interactions: customer_ok,
            total_customer_interactions: customer_total,
            aggregated_throughput: throughput,
            average_latency_ns,
        }
    }
}

impl std::fmt::Display for WorkloadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "workers:                  {}", self.workers)?;
        writeln!(f, "total runs:               {}", self.total_runs)?;
        writeln!(f, "successful interactions:  {}", self.successful_interactions)?;
        writeln!(
            f,
            "customer success:         {}/{}",
            self.successful_customer_interactions, self.total_customer_interactions
        )?;
        writeln!(
            f,
            "aggregated throughput:    {:.1} interactions/s",
            self.aggregated_throughput
        )?;
        write!(f, "average latency:          {:.0} ns", self.average_latency_ns)
    }
}
