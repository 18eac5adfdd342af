//! Statistics
//!
//! Time-weighted queue and resource statistics for one replication, and
//! the averaging of many replications into a single report.
//!
//! Categories are fixed: four wait lines (triage, bed, workup, specialist)
//! and three server pools (triage nurses, workup doctors, specialists).
//! Both are carried as small generic records so the same shape holds
//! instantaneous counts, accumulated areas and derived averages.

pub mod collector;
pub mod report;

pub use collector::StatisticsCollector;
pub use report::{AveragedResult, ReplicationResult};

use serde::{Deserialize, Serialize};

/// One value per wait-line category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QueueMetrics<T> {
    pub triage: T,
    pub bed: T,
    pub workup: T,
    pub specialist: T,
}

impl<T: Copy> QueueMetrics<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> QueueMetrics<U> {
        QueueMetrics {
            triage: f(self.triage),
            bed: f(self.bed),
            workup: f(self.workup),
            specialist: f(self.specialist),
        }
    }

    pub fn zip_with<S: Copy, U>(
        self,
        other: QueueMetrics<S>,
        mut f: impl FnMut(T, S) -> U,
    ) -> QueueMetrics<U> {
        QueueMetrics {
            triage: f(self.triage, other.triage),
            bed: f(self.bed, other.bed),
            workup: f(self.workup, other.workup),
            specialist: f(self.specialist, other.specialist),
        }
    }
}

/// One value per server pool
///
/// Named after the stage each pool serves: nurses triage, doctors run the
/// workup, specialists consult.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceMetrics<T> {
    pub triage: T,
    pub workup: T,
    pub specialist: T,
}

impl<T: Copy> ResourceMetrics<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ResourceMetrics<U> {
        ResourceMetrics {
            triage: f(self.triage),
            workup: f(self.workup),
            specialist: f(self.specialist),
        }
    }

    pub fn zip_with<S: Copy, U>(
        self,
        other: ResourceMetrics<S>,
        mut f: impl FnMut(T, S) -> U,
    ) -> ResourceMetrics<U> {
        ResourceMetrics {
            triage: f(self.triage, other.triage),
            workup: f(self.workup, other.workup),
            specialist: f(self.specialist, other.specialist),
        }
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
