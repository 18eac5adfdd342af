//! Per-replication statistics accumulator

use super::{ratio, QueueMetrics, ReplicationResult, ResourceMetrics};

/// Accumulates time-weighted areas, running maxima and counters
///
/// The engine feeds it once per processed event:
///
/// 1. [`accumulate`](Self::accumulate) with the interval just elapsed and
///    the state that held *over* that interval (before the handler ran)
/// 2. [`observe_peaks`](Self::observe_peaks) with the state *after* the
///    handler ran
///
/// Each category's maximum is tracked on its own.
#[derive(Debug, Clone, Default)]
pub struct StatisticsCollector {
    queue_area: QueueMetrics<f64>,
    max_queue: QueueMetrics<usize>,
    busy_area: ResourceMetrics<f64>,
    admitted: u64,
    departed: u64,
    preemptions: u64,
    events: u64,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` minutes at the given queue lengths and busy counts
    pub fn accumulate(
        &mut self,
        elapsed: f64,
        lengths: QueueMetrics<usize>,
        busy: ResourceMetrics<usize>,
    ) {
        self.queue_area = self
            .queue_area
            .zip_with(lengths, |area, len| area + elapsed * len as f64);
        self.busy_area = self
            .busy_area
            .zip_with(busy, |area, n| area + elapsed * n as f64);
    }

    pub fn observe_peaks(&mut self, lengths: QueueMetrics<usize>) {
        self.max_queue = self.max_queue.zip_with(lengths, usize::max);
    }

    pub fn record_admission(&mut self) {
        self.admitted += 1;
    }

    pub fn record_departure(&mut self) {
        self.departed += 1;
    }

    pub fn record_preemption(&mut self) {
        self.preemptions += 1;
    }

    pub fn record_event(&mut self) {
        self.events += 1;
    }

    pub fn admitted(&self) -> u64 {
        self.admitted
    }

    pub fn departed(&self) -> u64 {
        self.departed
    }

    pub fn preemptions(&self) -> u64 {
        self.preemptions
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn queue_area(&self) -> QueueMetrics<f64> {
        self.queue_area
    }

    pub fn busy_area(&self) -> ResourceMetrics<f64> {
        self.busy_area
    }

    pub fn max_queue(&self) -> QueueMetrics<usize> {
        self.max_queue
    }

    /// Derive the replication report
    ///
    /// `final_clock` is the time of the last processed event, which may
    /// overshoot the configured horizon.
    pub fn finish(&self, final_clock: f64, capacities: ResourceMetrics<usize>) -> ReplicationResult {
        let departed = self.departed as f64;
        let utilization_pct = self
            .busy_area
            .zip_with(capacities, |busy, cap| {
                ratio(busy, cap as f64 * final_clock) * 100.0
            });

        ReplicationResult {
            average_queue_length: self.queue_area.map(|area| ratio(area, final_clock)),
            average_wait: self.queue_area.map(|area| ratio(area, departed)),
            max_queue_length: self.max_queue,
            busy_time: self.busy_area,
            utilization_pct,
            idle_pct: utilization_pct.map(|u| 100.0 - u),
            patients_admitted: self.admitted,
            patients_departed: self.departed,
            preemptions: self.preemptions,
            final_clock,
            events_processed: self.events,
        }
    }
}
