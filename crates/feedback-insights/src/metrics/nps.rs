use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpsCategory {
    Promoter,
    Neutral,
    Detractor,
}

impl NpsCategory {
    pub const fn classify(nps: u8) -> Self {
        match nps {
            9.. => Self::Promoter,
            7..=8 => Self::Neutral,
            _ => Self::Detractor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Promoter => "Promoter",
            Self::Neutral => "Neutral",
            Self::Detractor => "Detractor",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpsResult {
    pub score: i32,
    pub promoters: usize,
    pub neutrals: usize,
    pub detractors: usize,
    pub total: usize,
}

/// Net Promoter Score: promoter share minus detractor share, in whole points.
///
/// The score is `(promoters - detractors) / total * 100` evaluated in `f64` and
/// truncated toward zero. An empty input scores 0.
pub fn calculate_nps(records: &[FeedbackRecord]) -> NpsResult {
    if records.is_empty() {
        return NpsResult::default();
    }

    let mut result = NpsResult {
        total: records.len(),
        ..NpsResult::default()
    };

    for record in records {
        match NpsCategory::classify(record.nps) {
            NpsCategory::Promoter => result.promoters += 1,
            NpsCategory::Neutral => result.neutrals += 1,
            NpsCategory::Detractor => result.detractors += 1,
        }
    }

    let net = result.promoters as f64 - result.detractors as f64;
    result.score = (net / result.total as f64 * 100.0) as i32;
    result
}

/// Records whose comments explain a low recommendation.
pub fn is_detractor(record: &FeedbackRecord) -> bool {
    NpsCategory::classify(record.nps) == NpsCategory::Detractor
}
