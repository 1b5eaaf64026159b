use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{FeedbackId, FeedbackRecord, FeedbackSubmission, ValidationError};
use super::repository::{FeedbackRepository, RepositoryError};

/// Supported dataset encodings for bulk ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    UnsupportedFormat(String),
    InvalidRow { row: usize, source: ValidationError },
    Repository(RepositoryError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read dataset: {}", err),
            IngestError::Json(err) => write!(f, "invalid JSON dataset: {}", err),
            IngestError::Csv(err) => write!(f, "invalid CSV dataset: {}", err),
            IngestError::UnsupportedFormat(path) => {
                write!(f, "unsupported dataset '{}': expected .json or .csv", path)
            }
            IngestError::InvalidRow { row, source } => {
                write!(f, "dataset row {} rejected: {}", row, source)
            }
            IngestError::Repository(err) => write!(f, "could not store dataset: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Json(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            IngestError::UnsupportedFormat(_) => None,
            IngestError::InvalidRow { source, .. } => Some(source),
            IngestError::Repository(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RepositoryError> for IngestError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: usize,
    /// Rows whose id was already stored and got overwritten.
    pub replaced: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetId {
    Text(String),
    Number(i64),
}

impl DatasetId {
    fn into_feedback_id(self) -> FeedbackId {
        match self {
            DatasetId::Text(value) => FeedbackId(value),
            DatasetId::Number(value) => FeedbackId(value.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    id: DatasetId,
    date: NaiveDate,
    nps: i64,
    csat: i64,
    ces: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    comment: Option<String>,
}

impl DatasetRow {
    fn into_record(self) -> Result<FeedbackRecord, ValidationError> {
        let id = self.id.into_feedback_id();
        FeedbackSubmission {
            date: self.date,
            nps: self.nps,
            csat: self.csat,
            ces: self.ces,
            comment: self.comment,
        }
        .into_record(id)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parses a dataset and validates every row before anything is stored.
///
/// Ingestion writes the whole dataset as one batch keyed by id, so re-running it
/// over the same file replaces rows instead of failing.
pub fn parse_dataset<R: Read>(
    reader: R,
    format: DatasetFormat,
) -> Result<Vec<FeedbackRecord>, IngestError> {
    let rows: Vec<DatasetRow> = match format {
        DatasetFormat::Json => serde_json::from_reader(reader)?,
        DatasetFormat::Csv => {
            let mut csv_reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            csv_reader
                .deserialize::<DatasetRow>()
                .collect::<Result<_, _>>()?
        }
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            row.into_record()
                .map_err(|source| IngestError::InvalidRow {
                    row: index + 1,
                    source,
                })
        })
        .collect()
}

pub fn ingest_reader<R, Repo>(
    reader: R,
    format: DatasetFormat,
    repository: &Repo,
) -> Result<IngestSummary, IngestError>
where
    R: Read,
    Repo: FeedbackRepository + ?Sized,
{
    let records = parse_dataset(reader, format)?;
    info!(records = records.len(), ?format, "ingesting feedback dataset");

    let outcome = repository.upsert_many(records)?;

    info!(
        inserted = outcome.inserted,
        replaced = outcome.replaced,
        "feedback dataset ingested"
    );
    Ok(IngestSummary {
        inserted: outcome.inserted,
        replaced: outcome.replaced,
    })
}

pub fn ingest_path<P, Repo>(path: P, repository: &Repo) -> Result<IngestSummary, IngestError>
where
    P: AsRef<Path>,
    Repo: FeedbackRepository + ?Sized,
{
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)
        .ok_or_else(|| IngestError::UnsupportedFormat(path.display().to_string()))?;
    let file = std::fs::File::open(path)?;
    ingest_reader(std::io::BufReader::new(file), format, repository)
}
