use serde::{Deserialize, Serialize};

use super::round2;
use crate::feedback::FeedbackRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsatCategory {
    Satisfied,
    Neutral,
    Unsatisfied,
}

impl CsatCategory {
    pub const fn classify(csat: u8) -> Self {
        match csat {
            4.. => Self::Satisfied,
            3 => Self::Neutral,
            _ => Self::Unsatisfied,
        }
    }
}

/// Customer satisfaction summary.
///
/// `score` is the mean rating on the 1-5 scale; `percentage` is the share of
/// satisfied respondents. They come from different formulas and are never
/// interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CsatResult {
    pub score: f64,
    pub percentage: f64,
    pub satisfied: usize,
    pub neutral: usize,
    pub unsatisfied: usize,
    pub total: usize,
}

pub fn calculate_csat(records: &[FeedbackRecord]) -> CsatResult {
    if records.is_empty() {
        return CsatResult::default();
    }

    let mut result = CsatResult {
        total: records.len(),
        ..CsatResult::default()
    };
    let mut sum = 0u64;

    for record in records {
        sum += u64::from(record.csat);
        match CsatCategory::classify(record.csat) {
            CsatCategory::Satisfied => result.satisfied += 1,
            CsatCategory::Neutral => result.neutral += 1,
            CsatCategory::Unsatisfied => result.unsatisfied += 1,
        }
    }

    let total = result.total as f64;
    result.score = round2(sum as f64 / total);
    result.percentage = round2(result.satisfied as f64 / total * 100.0);
    result
}

/// Records that fell short of "satisfied".
pub fn is_below_satisfied(record: &FeedbackRecord) -> bool {
    CsatCategory::classify(record.csat) != CsatCategory::Satisfied
}
