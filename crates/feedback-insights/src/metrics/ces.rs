use serde::{Deserialize, Serialize};

use super::round2;
use crate::feedback::FeedbackRecord;

/// Effort buckets. Lower effort is the better outcome, the opposite polarity of
/// NPS and CSAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl EffortLevel {
    pub const fn classify(ces: u8) -> Self {
        match ces {
            0..=2 => Self::Low,
            3 => Self::Medium,
            _ => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CesResult {
    pub score: f64,
    pub low_effort: usize,
    pub medium_effort: usize,
    pub high_effort: usize,
    pub total: usize,
}

/// Customer Effort Score: mean effort on the 1-5 scale, rounded to two decimals.
pub fn calculate_ces(records: &[FeedbackRecord]) -> CesResult {
    if records.is_empty() {
        return CesResult::default();
    }

    let mut result = CesResult {
        total: records.len(),
        ..CesResult::default()
    };
    let mut sum = 0u64;

    for record in records {
        sum += u64::from(record.ces);
        match EffortLevel::classify(record.ces) {
            EffortLevel::Low => result.low_effort += 1,
            EffortLevel::Medium => result.medium_effort += 1,
            EffortLevel::High => result.high_effort += 1,
        }
    }

    result.score = round2(sum as f64 / result.total as f64);
    result
}

pub fn is_high_effort(record: &FeedbackRecord) -> bool {
    EffortLevel::classify(record.ces) == EffortLevel::High
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::with_ces;

    #[test]
    fn one_of_each_bucket_averages_three() {
        let result = calculate_ces(&with_ces(&[1, 3, 5]));
        assert_eq!(
            result,
            CesResult {
                score: 3.0,
                low_effort: 1,
                medium_effort: 1,
                high_effort: 1,
                total: 3,
            }
        );
    }

    #[test]
    fn two_counts_as_low_and_four_as_high() {
        let result = calculate_ces(&with_ces(&[2, 2, 4]));
        assert_eq!(result.low_effort, 2);
        assert_eq!(result.high_effort, 1);
        assert_eq!(result.score, 2.67);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(calculate_ces(&[]), CesResult::default());
    }
}
