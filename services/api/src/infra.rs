use feedback_insights::config::StoreConfig;
use feedback_insights::feedback::{
    BatchOutcome, DateRange, FeedbackRecord, FeedbackRepository, InMemoryFeedbackRepository,
    JsonFileFeedbackRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Repository chosen at startup from `FEEDBACK_STORE_PATH`.
#[derive(Debug)]
pub(crate) enum FeedbackStore {
    Memory(InMemoryFeedbackRepository),
    File(JsonFileFeedbackRepository),
}

impl FeedbackStore {
    pub(crate) fn open(config: &StoreConfig) -> Result<Self, RepositoryError> {
        match &config.path {
            Some(path) => Ok(Self::File(JsonFileFeedbackRepository::open(path)?)),
            None => {
                info!("FEEDBACK_STORE_PATH not set; feedback is kept in memory only");
                Ok(Self::Memory(InMemoryFeedbackRepository::default()))
            }
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "json-file",
        }
    }
}

impl FeedbackRepository for FeedbackStore {
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        match self {
            Self::Memory(store) => store.insert(record),
            Self::File(store) => store.insert(record),
        }
    }

    fn upsert_many(&self, records: Vec<FeedbackRecord>) -> Result<BatchOutcome, RepositoryError> {
        match self {
            Self::Memory(store) => store.upsert_many(records),
            Self::File(store) => store.upsert_many(records),
        }
    }

    fn list(&self, range: &DateRange) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        match self {
            Self::Memory(store) => store.list(range),
            Self::File(store) => store.list(range),
        }
    }
}
