use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::repository::{CandidateId, CandidateRepository, RepositoryError};
use super::{CandidateRecord, HistoryEntry};
use crate::scoring::{CrsEngine, CrsError, Points, Profile};

/// Service composing the scoring engine with candidate storage.
pub struct ScoringService<R> {
    engine: CrsEngine,
    repository: Arc<R>,
}

impl<R> ScoringService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(engine: CrsEngine, repository: Arc<R>) -> Self {
        Self { engine, repository }
    }

    pub fn engine(&self) -> &CrsEngine {
        &self.engine
    }

    /// Score a new candidate and store the first history entry.
    pub fn register(
        &self,
        id: &CandidateId,
        profile: Profile,
        at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        let breakdown = self.engine.compute(&profile)?;
        let record = CandidateRecord::new(profile, breakdown, at);
        self.repository.insert(id, record.clone())?;
        Ok(record)
    }

    /// Recompute a stored candidate, with replacement inputs when given.
    pub fn recalculate(
        &self,
        id: &CandidateId,
        profile: Option<Profile>,
        at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        let record = self.get(id)?;
        let read_at = record.last_updated;
        let inputs = profile.unwrap_or_else(|| record.inputs.clone());

        let updated = super::recalculate(record, inputs, &self.engine, at)?;
        self.repository.update(id, updated.clone(), read_at)?;
        Ok(updated)
    }

    pub fn set_override(
        &self,
        id: &CandidateId,
        score: i64,
        reason: &str,
        author: &str,
        at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        let system_maximum = self.engine.system_maximum();
        self.modify(id, at, |record| {
            super::set_override(record, score, reason, author, at, system_maximum)
        })
    }

    pub fn disable_override(
        &self,
        id: &CandidateId,
        at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        self.modify(id, at, |record| Ok(super::disable_override(record)))
    }

    pub fn enable_override(
        &self,
        id: &CandidateId,
        at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        self.modify(id, at, super::enable_override)
    }

    pub fn clear_override(
        &self,
        id: &CandidateId,
        at: DateTime<Utc>,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        self.modify(id, at, |record| Ok(super::clear_override(record)))
    }

    pub fn effective_score(&self, id: &CandidateId) -> Result<Points, ScoringServiceError> {
        Ok(self.get(id)?.effective_score())
    }

    pub fn history(&self, id: &CandidateId) -> Result<Vec<HistoryEntry>, ScoringServiceError> {
        Ok(self.get(id)?.history)
    }

    pub fn get(&self, id: &CandidateId) -> Result<CandidateRecord, ScoringServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(record)
    }

    fn modify<F>(
        &self,
        id: &CandidateId,
        at: DateTime<Utc>,
        change: F,
    ) -> Result<CandidateRecord, ScoringServiceError>
    where
        F: FnOnce(CandidateRecord) -> Result<CandidateRecord, CrsError>,
    {
        let record = self.get(id)?;
        let read_at = record.last_updated;

        let mut updated = change(record)?;
        updated.touch(at);
        self.repository.update(id, updated.clone(), read_at)?;
        Ok(updated)
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Scoring(#[from] CrsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
