use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NPS_RANGE: (u8, u8) = (0, 10);
pub const CSAT_RANGE: (u8, u8) = (1, 5);
pub const CES_RANGE: (u8, u8) = (1, 5);

/// Opaque identifier of a stored feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

impl FeedbackId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Identifier as presented in API acknowledgements.
    pub fn external(&self) -> String {
        format!("fb_{}", self.0)
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single customer response. Scores are range-checked before a record is built
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub date: NaiveDate,
    pub nps: u8,
    pub csat: u8,
    pub ces: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl FeedbackRecord {
    /// The comment, when one was left and it is not blank.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .filter(|comment| !comment.trim().is_empty())
    }
}

/// Payload accepted at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub date: NaiveDate,
    pub nps: i64,
    pub csat: i64,
    pub ces: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl FeedbackSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let violations: Vec<FieldViolation> = [
            check_range("nps", self.nps, NPS_RANGE),
            check_range("csat", self.csat, CSAT_RANGE),
            check_range("ces", self.ces, CES_RANGE),
        ]
        .into_iter()
        .flatten()
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    pub fn into_record(self, id: FeedbackId) -> Result<FeedbackRecord, ValidationError> {
        self.validate()?;
        Ok(FeedbackRecord {
            id,
            date: self.date,
            // validated above, so the narrowing casts are lossless
            nps: self.nps as u8,
            csat: self.csat as u8,
            ces: self.ces as u8,
            comment: self.comment,
        })
    }
}

fn check_range(field: &'static str, value: i64, (min, max): (u8, u8)) -> Option<FieldViolation> {
    if value < i64::from(min) || value > i64::from(max) {
        Some(FieldViolation {
            field,
            message: format!("must be between {min} and {max} (got {value})"),
        })
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid feedback: {}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{} {}", violation.field, violation.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Inclusive, independently optional date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// `"YYYY-MM to YYYY-MM"` for a date-ordered record set.
pub fn period_label(records: &[FeedbackRecord]) -> Option<String> {
    let first = records.first()?;
    let last = records.last()?;
    Some(format!(
        "{} to {}",
        first.date.format("%Y-%m"),
        last.date.format("%Y-%m")
    ))
}
