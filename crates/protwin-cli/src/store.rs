//! Persistence of scores and simulation runs, keyed by a sequence identifier.

use crate::config::{StoreBackend, StoreSettings};
use chrono::{DateTime, Utc};
use protwin::core::models::bioreactor::BioreactorRun;
use protwin::core::models::kinetics::KineticRun;
use protwin::core::models::score::SequenceScore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Store file '{path}' is not valid JSON: {source}", path = path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "resultado", rename_all = "snake_case")]
pub enum StoredPayload {
    Analisis(SequenceScore),
    Laboratorio(KineticRun),
    Biorreactor(BioreactorRun),
}

impl StoredPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Analisis(_) => "analisis",
            Self::Laboratorio(_) => "laboratorio",
            Self::Biorreactor(_) => "biorreactor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub sequence_id: String,
    pub created_at: DateTime<Utc>,
    pub payload: StoredPayload,
}

impl StoredRecord {
    fn new(sequence_id: &str, payload: StoredPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence_id: sequence_id.to_string(),
            created_at: Utc::now(),
            payload,
        }
    }
}

/// Append-only result storage. Records are returned in insertion order.
pub trait ResultStore: Send {
    fn put(&mut self, sequence_id: &str, payload: StoredPayload) -> Result<StoredRecord, StoreError>;

    fn records(&self) -> &[StoredRecord];

    fn clear(&mut self) -> Result<usize, StoreError>;

    fn put_score(&mut self, sequence_id: &str, score: &SequenceScore) -> Result<StoredRecord, StoreError> {
        self.put(sequence_id, StoredPayload::Analisis(score.clone()))
    }

    fn put_lab(&mut self, sequence_id: &str, run: &KineticRun) -> Result<StoredRecord, StoreError> {
        self.put(sequence_id, StoredPayload::Laboratorio(run.clone()))
    }

    fn put_bioreactor(
        &mut self,
        sequence_id: &str,
        run: &BioreactorRun,
    ) -> Result<StoredRecord, StoreError> {
        self.put(sequence_id, StoredPayload::Biorreactor(run.clone()))
    }

    /// The most recently stored score for `sequence_id`.
    fn latest_score(&self, sequence_id: &str) -> Option<&SequenceScore> {
        self.records()
            .iter()
            .rev()
            .filter(|r| r.sequence_id == sequence_id)
            .find_map(|r| match &r.payload {
                StoredPayload::Analisis(score) => Some(score),
                _ => None,
            })
    }

    fn history(&self, sequence_id: Option<&str>) -> Vec<&StoredRecord> {
        self.records()
            .iter()
            .filter(|r| sequence_id.is_none_or(|id| r.sequence_id == id))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<StoredRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn put(&mut self, sequence_id: &str, payload: StoredPayload) -> Result<StoredRecord, StoreError> {
        let record = StoredRecord::new(sequence_id, payload);
        self.records.push(record.clone());
        Ok(record)
    }

    fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }
}

/// Keeps every record in a single JSON array on disk, rewritten on each change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<StoredRecord>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(path = %path.display(), records = records.len(), "Opened result store.");
        Ok(Self { path, records })
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&self.records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}

impl ResultStore for JsonFileStore {
    fn put(&mut self, sequence_id: &str, payload: StoredPayload) -> Result<StoredRecord, StoreError> {
        let record = StoredRecord::new(sequence_id, payload);
        self.records.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.records.len();
        self.records.clear();
        self.persist()?;
        info!(removed, path = %self.path.display(), "Cleared result store.");
        Ok(removed)
    }
}

pub fn open(settings: &StoreSettings) -> Result<Box<dyn ResultStore>, StoreError> {
    Ok(match settings.backend {
        StoreBackend::Memory => Box::new(MemoryStore::new()),
        StoreBackend::Json => Box::new(JsonFileStore::open(&settings.path)?),
    })
}
