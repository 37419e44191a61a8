use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CandidateRecord;

/// Identifier wrapper for scored candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction for candidate records.
///
/// `update` is a compare-and-swap on `last_updated`: it only succeeds when the stored
/// record still carries the timestamp the caller read and the new record carries a later
/// one, so two concurrent writers cannot silently drop each other's change.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, id: &CandidateId, record: CandidateRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError>;
    fn update(
        &self,
        id: &CandidateId,
        record: CandidateRecord,
        expected_last_updated: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<CandidateId>, RepositoryError>;
}

/// Whether `record` may replace `stored`: the caller read the current token and the
/// replacement carries a later one.
pub fn advances_token(
    stored: &CandidateRecord,
    record: &CandidateRecord,
    expected_last_updated: DateTime<Utc>,
) -> bool {
    stored.last_updated == expected_last_updated && record.last_updated > expected_last_updated
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("candidate {0} already exists")]
    AlreadyExists(CandidateId),
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error("candidate {0} was modified concurrently")]
    Conflict(CandidateId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded map, for tests and single-process embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCandidateRepository {
    records: Arc<Mutex<BTreeMap<CandidateId, CandidateRecord>>>,
}

impl InMemoryCandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<CandidateId, CandidateRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, id: &CandidateId, record: CandidateRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(id) {
            return Err(RepositoryError::AlreadyExists(id.clone()));
        }
        guard.insert(id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn update(
        &self,
        id: &CandidateId,
        record: CandidateRecord,
        expected_last_updated: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let stored = guard
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        if !advances_token(stored, &record, expected_last_updated) {
            return Err(RepositoryError::Conflict(id.clone()));
        }
        *stored = record;
        Ok(())
    }

    fn list(&self) -> Result<Vec<CandidateId>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.keys().cloned().collect())
    }
}
