//! Wait queues
//!
//! Every queue is FIFO. Urgency-split queues (bed wait, workup wait and the
//! interrupt buffers) are indexed by [`Bucket`]; the interrupt buffers only
//! ever hold `Class2` and `Class345` patients because class 1 cannot be
//! preempted.

use crate::models::patient::{Bucket, PatientId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// FIFO queues split by eligibility bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketQueues {
    queues: [VecDeque<PatientId>; 3],
}

impl BucketQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: Bucket, patient: PatientId) {
        self.queues[bucket.index()].push_back(patient);
    }

    pub fn pop(&mut self, bucket: Bucket) -> Option<PatientId> {
        self.queues[bucket.index()].pop_front()
    }

    pub fn len(&self, bucket: Bucket) -> usize {
        self.queues[bucket.index()].len()
    }

    pub fn total_len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Pop from the first non-empty bucket in `precedence` order
    pub fn pop_first(&mut self, precedence: &[Bucket]) -> Option<(Bucket, PatientId)> {
        precedence
            .iter()
            .copied()
            .find_map(|b| self.pop(b).map(|p| (b, p)))
    }

    /// All queued patients with the bucket each one sits in
    pub fn entries(&self) -> impl Iterator<Item = (Bucket, PatientId)> + '_ {
        Bucket::ALL
            .into_iter()
            .flat_map(move |b| self.queues[b.index()].iter().map(move |p| (b, *p)))
    }
}

/// All waiting lines in the department
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitQueues {
    /// Walk-ins waiting for a nurse
    pub triage: VecDeque<PatientId>,
    /// Classified patients waiting for a bed
    pub bed: BucketQueues,
    /// Bedded patients waiting for a doctor
    pub workup: BucketQueues,
    /// Patients whose workup was preempted
    pub interrupted: BucketQueues,
    /// Patients waiting for the specialist
    pub specialist: VecDeque<PatientId>,
}

impl WaitQueues {
    pub fn new() -> Self {
        Self::default()
    }
}
