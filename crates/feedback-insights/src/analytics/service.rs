use std::sync::Arc;

use tracing::{info, instrument};

use super::views::{
    ActionPlansView, CesDistribution, CsatDistribution, IndicatorView, NpsDistribution,
    OverviewMetrics, OverviewView, SegmentInsightView, SegmentsView, SubmissionAck,
    SubmissionData, TopicsView,
};
use crate::feedback::{
    period_label, DateRange, FeedbackId, FeedbackRecord, FeedbackRepository, FeedbackSubmission,
    RepositoryError, ValidationError,
};
use crate::insights::{Drivers, IndicatorDetail, InsightGenerator};
use crate::metrics::{
    calculate_ces, calculate_csat, calculate_nps, compute_all, is_below_satisfied,
    is_detractor, is_high_effort, MetricsResult,
};

/// Orchestrates repository, metrics engine and insight generator per request.
pub struct AnalyticsService<R> {
    repository: Arc<R>,
    insights: Arc<InsightGenerator>,
}

/// Share of `total` represented by `count`, as a whole percentage rounded half up.
///
/// Computed on integers so exact halves such as 29/200 round up.
pub fn segment_share(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (2 * total)) as u32
}

fn comments_where<F>(records: &[FeedbackRecord], keep: F) -> Vec<String>
where
    F: Fn(&FeedbackRecord) -> bool,
{
    records
        .iter()
        .filter(|record| keep(record))
        .filter_map(FeedbackRecord::comment_text)
        .map(str::to_string)
        .collect()
}

impl<R> AnalyticsService<R>
where
    R: FeedbackRepository + 'static,
{
    pub fn new(repository: Arc<R>, insights: Arc<InsightGenerator>) -> Self {
        Self {
            repository,
            insights,
        }
    }

    /// Validate and store a new feedback record.
    ///
    /// Repository writes may block on file I/O, so they run on the blocking pool.
    pub async fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<SubmissionAck, AnalyticsError> {
        let record = submission.into_record(FeedbackId::generate())?;
        let repository = Arc::clone(&self.repository);
        let stored = tokio::task::spawn_blocking(move || repository.insert(record))
            .await
            .map_err(|err| {
                RepositoryError::Unavailable(format!("store write aborted: {err}"))
            })??;
        info!(id = %stored.id, date = %stored.date, "feedback stored");

        Ok(SubmissionAck {
            status: "success",
            message: "Feedback stored successfully",
            data: SubmissionData {
                id: stored.id.external(),
                date: stored.date,
            },
        })
    }

    /// Records for the period, or `NoData` when the period is empty.
    pub fn records(&self, range: &DateRange) -> Result<Vec<FeedbackRecord>, AnalyticsError> {
        let records = self.repository.list(range)?;
        if records.is_empty() {
            return Err(AnalyticsError::NoData);
        }
        Ok(records)
    }

    pub fn metrics(&self, range: &DateRange) -> Result<MetricsResult, AnalyticsError> {
        let records = self.records(range)?;
        Ok(compute_all(&records))
    }

    #[instrument(skip(self))]
    pub async fn overview(&self, range: &DateRange) -> Result<OverviewView, AnalyticsError> {
        let records = self.records(range)?;
        let metrics = compute_all(&records);
        let comments = comments_where(&records, |_| true);
        let executive_summary = self.insights.executive_summary(&metrics, &comments).await;

        Ok(OverviewView {
            period: period_label(&records).unwrap_or_default(),
            metrics: OverviewMetrics {
                nps_avg: metrics.nps.score,
                csat_avg: metrics.csat.percentage,
                ces_avg: metrics.ces.score,
            },
            executive_summary,
        })
    }

    #[instrument(skip(self))]
    pub async fn nps(
        &self,
        range: &DateRange,
    ) -> Result<IndicatorView<NpsDistribution>, AnalyticsError> {
        let records = self.records(range)?;
        let nps = calculate_nps(&records);
        let comments = comments_where(&records, is_detractor);
        let insight = self
            .insights
            .indicator_insight(IndicatorDetail::Nps(&nps), &comments)
            .await;

        Ok(IndicatorView {
            distribution: NpsDistribution {
                promoters: nps.promoters,
                neutrals: nps.neutrals,
                detractors: nps.detractors,
            },
            insight,
        })
    }

    #[instrument(skip(self))]
    pub async fn csat(
        &self,
        range: &DateRange,
    ) -> Result<IndicatorView<CsatDistribution>, AnalyticsError> {
        let records = self.records(range)?;
        let csat = calculate_csat(&records);
        let comments = comments_where(&records, is_below_satisfied);
        let insight = self
            .insights
            .indicator_insight(IndicatorDetail::Csat(&csat), &comments)
            .await;

        Ok(IndicatorView {
            distribution: CsatDistribution {
                satisfied: csat.satisfied,
                neutral: csat.neutral,
                unsatisfied: csat.unsatisfied,
            },
            insight,
        })
    }

    #[instrument(skip(self))]
    pub async fn ces(
        &self,
        range: &DateRange,
    ) -> Result<IndicatorView<CesDistribution>, AnalyticsError> {
        let records = self.records(range)?;
        let ces = calculate_ces(&records);
        let comments = comments_where(&records, is_high_effort);
        let insight = self
            .insights
            .indicator_insight(IndicatorDetail::Ces(&ces), &comments)
            .await;

        Ok(IndicatorView {
            distribution: CesDistribution {
                low_effort: ces.low_effort,
                medium_effort: ces.medium_effort,
                high_effort: ces.high_effort,
            },
            insight,
        })
    }

    #[instrument(skip(self))]
    pub async fn drivers(&self, range: &DateRange) -> Result<Drivers, AnalyticsError> {
        let records = self.records(range)?;
        let comments = comments_where(&records, |_| true);
        Ok(self.insights.drivers(&comments).await)
    }

    #[instrument(skip(self))]
    pub async fn topics(&self, range: &DateRange) -> Result<TopicsView, AnalyticsError> {
        let records = self.records(range)?;
        let comments = comments_where(&records, |_| true);
        Ok(TopicsView {
            topics: self.insights.topics(&comments).await,
        })
    }

    #[instrument(skip(self))]
    pub async fn segments(&self, range: &DateRange) -> Result<SegmentsView, AnalyticsError> {
        let records = self.records(range)?;
        let total = records.len();
        let metrics = compute_all(&records);
        let descriptions = self.insights.segment_descriptions(&metrics.segments).await;

        let segments = descriptions
            .into_iter()
            .filter_map(|description| {
                metrics
                    .segments
                    .get(&description.key)
                    .map(|segment| SegmentInsightView {
                        segment: segment.label.clone(),
                        percentage: segment_share(segment.count, total),
                        description: description.description,
                    })
            })
            .collect();

        Ok(SegmentsView { segments })
    }

    #[instrument(skip(self))]
    pub async fn action_plans(&self, range: &DateRange) -> Result<ActionPlansView, AnalyticsError> {
        let records = self.records(range)?;
        let metrics = compute_all(&records);
        let comments = comments_where(&records, |_| true);
        Ok(ActionPlansView {
            action_plans: self.insights.action_plans(&metrics, &comments).await,
        })
    }
}

/// Error raised by the analytics service.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("no feedback found for the selected period")]
    NoData,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
