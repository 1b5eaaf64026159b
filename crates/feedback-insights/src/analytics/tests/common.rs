use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::analytics::{analytics_router, AnalyticsService};
use crate::feedback::{
    BatchOutcome, DateRange, FeedbackId, FeedbackRecord, FeedbackRepository, FeedbackSubmission,
    InMemoryFeedbackRepository, RepositoryError,
};
use crate::insights::{CompletionRequest, InsightGenerator, ProviderError, TextGenerator};

pub(super) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).expect("valid date")
}

pub(super) fn record(
    id: &str,
    day: u32,
    (nps, csat, ces): (u8, u8, u8),
    comment: Option<&str>,
) -> FeedbackRecord {
    FeedbackRecord {
        id: FeedbackId(id.to_string()),
        date: date(day),
        nps,
        csat,
        ces,
        comment: comment.map(str::to_string),
    }
}

/// Eight responses across January 2025 covering every bucket of every indicator.
pub(super) fn seeded_records() -> Vec<FeedbackRecord> {
    vec![
        record("r1", 3, (10, 5, 1), Some("Checkout took seconds")),
        record("r2", 4, (9, 4, 2), Some("Friendly staff")),
        record("r3", 8, (2, 1, 5), Some("Had to call three times")),
        record("r4", 9, (5, 2, 4), Some("Refund still missing")),
        record("r5", 15, (8, 3, 3), None),
        record("r6", 16, (7, 4, 3), Some("  ")),
        record("r7", 22, (6, 3, 4), Some("Website kept crashing")),
        record("r8", 30, (9, 5, 1), None),
    ]
}

pub(super) fn submission(nps: i64, csat: i64, ces: i64) -> FeedbackSubmission {
    FeedbackSubmission {
        date: date(12),
        nps,
        csat,
        ces,
        comment: Some("Quick delivery".to_string()),
    }
}

/// Replies with a fixed text and records every prompt it receives.
#[derive(Default)]
pub(super) struct RecordingGenerator {
    reply: String,
    pub(super) prompts: Mutex<Vec<CompletionRequest>>,
}

impl RecordingGenerator {
    pub(super) fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn prompts(&self) -> Vec<CompletionRequest> {
        self.prompts.lock().expect("prompt mutex").clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.prompts.lock().expect("prompt mutex").push(request);
        Ok(self.reply.clone())
    }
}

pub(super) struct UnavailableRepository;

impl FeedbackRepository for UnavailableRepository {
    fn insert(&self, _record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn upsert_many(
        &self,
        _records: Vec<FeedbackRecord>,
    ) -> Result<BatchOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self, _range: &DateRange) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service(
    generator: InsightGenerator,
) -> (
    Arc<AnalyticsService<InMemoryFeedbackRepository>>,
    Arc<InMemoryFeedbackRepository>,
) {
    let repository = Arc::new(InMemoryFeedbackRepository::with_records(seeded_records()));
    let service = Arc::new(AnalyticsService::new(
        repository.clone(),
        Arc::new(generator),
    ));
    (service, repository)
}

pub(super) fn seeded_router(generator: InsightGenerator) -> axum::Router {
    let (service, _) = build_service(generator);
    analytics_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
