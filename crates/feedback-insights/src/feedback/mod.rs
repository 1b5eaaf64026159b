//! Feedback records, their storage, and bulk ingestion.

pub mod domain;
pub mod ingest;
pub mod repository;

pub use domain::{
    period_label, DateRange, FeedbackId, FeedbackRecord, FeedbackSubmission, FieldViolation,
    ValidationError,
};
pub use ingest::{ingest_path, ingest_reader, DatasetFormat, IngestError, IngestSummary};
pub use repository::{
    BatchOutcome, FeedbackRepository, InMemoryFeedbackRepository, JsonFileFeedbackRepository,
    RepositoryError,
};
