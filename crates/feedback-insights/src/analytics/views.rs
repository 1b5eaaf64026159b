use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::feedback::DateRange;
use crate::insights::{ActionPlan, Topic};

/// `start_date` / `end_date` query parameters shared by every read endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PeriodQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl PeriodQuery {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAck {
    pub status: &'static str,
    pub message: &'static str,
    pub data: SubmissionData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionData {
    pub id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewMetrics {
    pub nps_avg: i32,
    /// Share of satisfied respondents, not the mean rating.
    pub csat_avg: f64,
    pub ces_avg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub period: String,
    pub metrics: OverviewMetrics,
    pub executive_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NpsDistribution {
    pub promoters: usize,
    pub neutrals: usize,
    pub detractors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CsatDistribution {
    pub satisfied: usize,
    pub neutral: usize,
    pub unsatisfied: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CesDistribution {
    pub low_effort: usize,
    pub medium_effort: usize,
    pub high_effort: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorView<D> {
    pub distribution: D,
    pub insight: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicsView {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentInsightView {
    pub segment: String,
    pub percentage: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentsView {
    pub segments: Vec<SegmentInsightView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionPlansView {
    pub action_plans: Vec<ActionPlan>,
}
