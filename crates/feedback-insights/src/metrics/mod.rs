//! Deterministic feedback indicators.
//!
//! Every function here is a pure computation over a slice of records: no I/O, no
//! shared state, safe to call concurrently. Empty input never fails; each
//! calculator documents the value it returns for it.

mod ces;
mod csat;
mod nps;
mod segments;

use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackRecord;

pub use ces::{calculate_ces, is_high_effort, CesResult, EffortLevel};
pub use csat::{calculate_csat, is_below_satisfied, CsatCategory, CsatResult};
pub use nps::{calculate_nps, is_detractor, NpsCategory, NpsResult};
pub use segments::{identify_segments, Segment, SegmentKey, Segments, MAX_SAMPLE_COMMENTS};

/// All indicators for one record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub nps: NpsResult,
    pub csat: CsatResult,
    pub ces: CesResult,
    pub segments: Segments,
}

pub fn compute_all(records: &[FeedbackRecord]) -> MetricsResult {
    MetricsResult {
        nps: calculate_nps(records),
        csat: calculate_csat(records),
        ces: calculate_ces(records),
        segments: identify_segments(records),
    }
}

/// Two-decimal rounding, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
