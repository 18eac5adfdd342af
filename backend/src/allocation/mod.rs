//! Allocation precedence tables
//!
//! Fixed orderings that decide which zone a patient is bedded in, which
//! waiting patient gets a freed bed, and which waiting patient gets a freed
//! doctor. Every lookup is "first available wins".
//!
//! | Class | Preferred | Fallback | Bed-wait bucket |
//! |---|---|---|---|
//! | 1 | 1 | 2 | Class1 |
//! | 2 | 2 | 3, 4 | Class2 |
//! | 3, 4 (ambulance) | 3 | 4 | Class345 |
//! | 3, 4, 5 (after triage) | 4 | 3 | Class345 |

use crate::models::patient::{Bucket, TriageClass, Zone};

const CLASS1_ZONES: [Zone; 2] = [Zone::One, Zone::Two];
const CLASS2_ZONES: [Zone; 3] = [Zone::Two, Zone::Three, Zone::Four];
const CLASS345_ZONES: [Zone; 2] = [Zone::Three, Zone::Four];
const POST_TRIAGE_ZONES: [Zone; 2] = [Zone::Four, Zone::Three];

/// Interrupted patients resume before anyone queued, less urgent last
pub const INTERRUPT_DRAIN_ORDER: [Bucket; 2] = [Bucket::Class2, Bucket::Class345];

/// Workup queue order once the interrupt buffers are empty
pub const WORKUP_DRAIN_ORDER: [Bucket; 3] = [Bucket::Class1, Bucket::Class2, Bucket::Class345];

/// Zone preference for a patient classified on arrival
pub fn arrival_zones(class: TriageClass) -> &'static [Zone] {
    eligible_zones(class.bucket())
}

/// Zone preference for a walk-in leaving triage
pub fn post_triage_zones() -> &'static [Zone] {
    &POST_TRIAGE_ZONES
}

/// Zones a bucket may occupy, in arrival preference order
pub fn eligible_zones(bucket: Bucket) -> &'static [Zone] {
    match bucket {
        Bucket::Class1 => &CLASS1_ZONES,
        Bucket::Class2 => &CLASS2_ZONES,
        Bucket::Class345 => &CLASS345_ZONES,
    }
}

/// Which bed-wait buckets may take a freed bed in `zone`, in order
///
/// # Example
/// ```
/// use ed_simulator_core::allocation::backfill_precedence;
/// use ed_simulator_core::models::{Bucket, Zone};
///
/// assert_eq!(backfill_precedence(Zone::Three), &[Bucket::Class2, Bucket::Class345]);
/// assert_eq!(backfill_precedence(Zone::One), &[Bucket::Class1]);
/// ```
pub fn backfill_precedence(zone: Zone) -> &'static [Bucket] {
    match zone {
        Zone::One => &[Bucket::Class1],
        Zone::Two => &[Bucket::Class1, Bucket::Class2],
        Zone::Three | Zone::Four => &[Bucket::Class2, Bucket::Class345],
    }
}
