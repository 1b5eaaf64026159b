use std::collections::HashSet;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use super::domain::{DateRange, FeedbackId, FeedbackRecord};

/// Storage abstraction feeding the metrics engine.
///
/// `list` returns the records inside `range` ordered by date ascending; records that
/// share a date keep their insertion order.
pub trait FeedbackRepository: Send + Sync {
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError>;

    /// Writes a batch keyed by id: unknown ids are appended, known ids are replaced in
    /// place. The batch is applied whole or not at all.
    fn upsert_many(&self, records: Vec<FeedbackRecord>) -> Result<BatchOutcome, RepositoryError>;

    fn list(&self, range: &DateRange) -> Result<Vec<FeedbackRecord>, RepositoryError>;
}

/// Counts reported by [`FeedbackRepository::upsert_many`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub replaced: usize,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("batch repeats record id '{0}'")]
    DuplicateInBatch(FeedbackId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("feedback store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("feedback store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn filtered(records: &[FeedbackRecord], range: &DateRange) -> Vec<FeedbackRecord> {
    let mut selected: Vec<FeedbackRecord> = records
        .iter()
        .filter(|record| range.contains(record.date))
        .cloned()
        .collect();
    // stable: same-day records stay in insertion order
    selected.sort_by_key(|record| record.date);
    selected
}

/// Applies `batch` onto `records`. Fails before touching `records` when the batch
/// repeats an id.
fn apply_batch(
    records: &mut Vec<FeedbackRecord>,
    batch: Vec<FeedbackRecord>,
) -> Result<BatchOutcome, RepositoryError> {
    {
        let mut seen = HashSet::with_capacity(batch.len());
        if let Some(repeated) = batch.iter().find(|record| !seen.insert(&record.id)) {
            return Err(RepositoryError::DuplicateInBatch(repeated.id.clone()));
        }
    }

    let mut outcome = BatchOutcome::default();
    for record in batch {
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                outcome.replaced += 1;
            }
            None => {
                records.push(record);
                outcome.inserted += 1;
            }
        }
    }
    Ok(outcome)
}

fn lock(
    records: &Mutex<Vec<FeedbackRecord>>,
) -> Result<MutexGuard<'_, Vec<FeedbackRecord>>, RepositoryError> {
    records
        .lock()
        .map_err(|_| RepositoryError::Unavailable("feedback store mutex poisoned".to_string()))
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryFeedbackRepository {
    records: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl InMemoryFeedbackRepository {
    pub fn with_records(records: Vec<FeedbackRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(lock(&self.records)?.is_empty())
    }
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn upsert_many(&self, records: Vec<FeedbackRecord>) -> Result<BatchOutcome, RepositoryError> {
        let mut guard = lock(&self.records)?;
        apply_batch(&mut guard, records)
    }

    fn list(&self, range: &DateRange) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(filtered(&guard, range))
    }
}

/// Key-value store persisted as a JSON array of records, keyed by record id.
///
/// The file is read once at open and rewritten on each write through a sibling
/// `.tmp` file followed by a rename. Writes block the calling thread; async callers
/// go through `spawn_blocking`.
#[derive(Debug)]
pub struct JsonFileFeedbackRepository {
    path: PathBuf,
    records: Mutex<Vec<FeedbackRecord>>,
}

impl JsonFileFeedbackRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<FeedbackRecord>>(&raw)?
            }
        } else {
            Vec::new()
        };

        info!(path = %path.display(), records = records.len(), "feedback store opened");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[FeedbackRecord]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let payload = serde_json::to_vec_pretty(records)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&payload)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), records = records.len(), "feedback store flushed");
        Ok(())
    }
}

impl FeedbackRepository for JsonFileFeedbackRepository {
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        if let Err(err) = self.persist(&guard) {
            guard.pop();
            return Err(err);
        }
        Ok(record)
    }

    fn upsert_many(&self, records: Vec<FeedbackRecord>) -> Result<BatchOutcome, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let mut staged = guard.clone();
        let outcome = apply_batch(&mut staged, records)?;
        self.persist(&staged)?;
        *guard = staged;
        Ok(outcome)
    }

    fn list(&self, range: &DateRange) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(filtered(&guard, range))
    }
}
