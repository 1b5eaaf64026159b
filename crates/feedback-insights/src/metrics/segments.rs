use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackRecord;

pub const MAX_SAMPLE_COMMENTS: usize = 5;

/// Fixed cross-indicator cohorts. Cohorts may overlap and do not cover every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKey {
    HighEffortDetractors,
    LowEffortPromoters,
}

impl SegmentKey {
    pub const fn ordered() -> [SegmentKey; 2] {
        [Self::HighEffortDetractors, Self::LowEffortPromoters]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::HighEffortDetractors => "high_effort_detractors",
            Self::LowEffortPromoters => "low_effort_promoters",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighEffortDetractors => "High-effort detractors",
            Self::LowEffortPromoters => "Low-effort promoters",
        }
    }

    pub fn matches(self, record: &FeedbackRecord) -> bool {
        match self {
            Self::HighEffortDetractors => record.ces >= 4 && record.nps <= 6,
            Self::LowEffortPromoters => record.ces <= 2 && record.nps >= 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub count: usize,
    pub label: String,
    pub sample_comments: Vec<String>,
}

pub type Segments = BTreeMap<SegmentKey, Segment>;

/// Builds every segment over `records`.
///
/// Sample comments are the first non-blank comments of the cohort in input order,
/// so they depend on the order the repository delivers. Whitespace-only comments
/// count as missing and are never sampled, even though they are non-empty strings.
/// An empty input yields an empty map rather than zero-count segments.
pub fn identify_segments(records: &[FeedbackRecord]) -> Segments {
    if records.is_empty() {
        return Segments::new();
    }

    SegmentKey::ordered()
        .into_iter()
        .map(|key| (key, build_segment(key, records)))
        .collect()
}

fn build_segment(key: SegmentKey, records: &[FeedbackRecord]) -> Segment {
    let cohort: Vec<&FeedbackRecord> = records
        .iter()
        .filter(|record| key.matches(record))
        .collect();

    let sample_comments = cohort
        .iter()
        .filter_map(|record| record.comment_text())
        .take(MAX_SAMPLE_COMMENTS)
        .map(str::to_string)
        .collect();

    Segment {
        count: cohort.len(),
        label: key.label().to_string(),
        sample_comments,
    }
}
