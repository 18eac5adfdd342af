//! Replication reports

use super::{QueueMetrics, ResourceMetrics};
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};

/// Statistics of a single replication
///
/// Averages divide by the final clock (time-weighted lengths) or by the
/// number of departed patients (waits). Utilization and idle time are
/// percentages of `capacity × final_clock` and always sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationResult {
    pub average_queue_length: QueueMetrics<f64>,
    pub average_wait: QueueMetrics<f64>,
    pub max_queue_length: QueueMetrics<usize>,
    pub busy_time: ResourceMetrics<f64>,
    pub utilization_pct: ResourceMetrics<f64>,
    pub idle_pct: ResourceMetrics<f64>,
    pub patients_admitted: u64,
    pub patients_departed: u64,
    pub preemptions: u64,
    pub final_clock: f64,
    pub events_processed: u64,
}

/// Element-wise mean over replications
///
/// Counts and maxima are averaged as reals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedResult {
    pub replications: usize,
    pub average_queue_length: QueueMetrics<f64>,
    pub average_wait: QueueMetrics<f64>,
    pub max_queue_length: QueueMetrics<f64>,
    pub busy_time: ResourceMetrics<f64>,
    pub utilization_pct: ResourceMetrics<f64>,
    pub idle_pct: ResourceMetrics<f64>,
    pub patients_admitted: f64,
    pub patients_departed: f64,
    pub preemptions: f64,
    pub final_clock: f64,
    pub events_processed: f64,
}

impl AveragedResult {
    /// Average a non-empty set of replication results
    ///
    /// # Errors
    /// `InvalidConfig` when `results` is empty.
    pub fn average(results: &[ReplicationResult]) -> Result<Self, SimulationError> {
        if results.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "cannot average zero replications".to_string(),
            ));
        }
        let n = results.len() as f64;

        let mean_q = |get: fn(&ReplicationResult) -> QueueMetrics<f64>| {
            results
                .iter()
                .map(get)
                .fold(QueueMetrics::<f64>::default(), |acc, q| {
                    acc.zip_with(q, |a: f64, b: f64| a + b)
                })
                .map(|sum: f64| sum / n)
        };
        let mean_r = |get: fn(&ReplicationResult) -> ResourceMetrics<f64>| {
            results
                .iter()
                .map(get)
                .fold(ResourceMetrics::<f64>::default(), |acc, r| {
                    acc.zip_with(r, |a: f64, b: f64| a + b)
                })
                .map(|sum: f64| sum / n)
        };
        let mean = |get: fn(&ReplicationResult) -> f64| results.iter().map(get).sum::<f64>() / n;

        Ok(Self {
            replications: results.len(),
            average_queue_length: mean_q(|r| r.average_queue_length),
            average_wait: mean_q(|r| r.average_wait),
            max_queue_length: mean_q(|r| r.max_queue_length.map(|m| m as f64)),
            busy_time: mean_r(|r| r.busy_time),
            utilization_pct: mean_r(|r| r.utilization_pct),
            idle_pct: mean_r(|r| r.idle_pct),
            patients_admitted: mean(|r| r.patients_admitted as f64),
            patients_departed: mean(|r| r.patients_departed as f64),
            preemptions: mean(|r| r.preemptions as f64),
            final_clock: mean(|r| r.final_clock),
            events_processed: mean(|r| r.events_processed as f64),
        })
    }
}
