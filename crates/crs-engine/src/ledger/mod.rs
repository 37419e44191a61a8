//! Append-only score history and the manual override that can supersede it.
//!
//! Every operation here is a pure function over a `CandidateRecord`: it consumes the
//! record and returns the updated value. Storage and write ordering belong to a
//! `CandidateRepository`.

mod export;
pub mod repository;
pub mod service;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{Breakdown, CrsEngine, CrsError, Points, Profile};

pub use export::export_history_csv;
pub use repository::{
    advances_token, CandidateId, CandidateRepository, InMemoryCandidateRepository,
    RepositoryError,
};
pub use service::{ScoringService, ScoringServiceError};

/// Snapshot of one computation. Entries are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub score: Points,
    pub breakdown: Breakdown,
    pub calculated_at: DateTime<Utc>,
}

/// Audit fields of a manual override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideDetails {
    pub score: Points,
    pub reason: String,
    pub set_by: String,
    pub set_at: DateTime<Utc>,
}

/// Manual override. An inactive override keeps its fields for audit and can be
/// re-enabled; it no longer affects the effective score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OverrideDocument", into = "OverrideDocument")]
pub enum Override {
    Active(OverrideDetails),
    Inactive(OverrideDetails),
}

impl Override {
    pub fn details(&self) -> &OverrideDetails {
        match self {
            Override::Active(details) | Override::Inactive(details) => details,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Override::Active(_))
    }

    fn into_details(self) -> OverrideDetails {
        match self {
            Override::Active(details) | Override::Inactive(details) => details,
        }
    }
}

/// Stored shape of an override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverrideDocument {
    enabled: bool,
    score: Points,
    reason: String,
    set_by: String,
    set_at: DateTime<Utc>,
}

impl From<OverrideDocument> for Override {
    fn from(document: OverrideDocument) -> Self {
        let details = OverrideDetails {
            score: document.score,
            reason: document.reason,
            set_by: document.set_by,
            set_at: document.set_at,
        };
        if document.enabled {
            Override::Active(details)
        } else {
            Override::Inactive(details)
        }
    }
}

impl From<Override> for OverrideDocument {
    fn from(value: Override) -> Self {
        let enabled = value.is_active();
        let details = value.into_details();
        Self {
            enabled,
            score: details.score,
            reason: details.reason,
            set_by: details.set_by,
            set_at: details.set_at,
        }
    }
}

/// Persisted aggregate for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub inputs: Profile,
    pub current_score: Points,
    pub breakdown: Breakdown,
    pub history: Vec<HistoryEntry>,
    #[serde(rename = "override", default)]
    pub score_override: Option<Override>,
    pub last_updated: DateTime<Utc>,
}

impl CandidateRecord {
    /// First computation for a candidate; the history starts with one entry.
    pub fn new(inputs: Profile, breakdown: Breakdown, calculated_at: DateTime<Utc>) -> Self {
        Self {
            inputs,
            current_score: breakdown.grand_total,
            breakdown: breakdown.clone(),
            history: vec![HistoryEntry {
                score: breakdown.grand_total,
                breakdown,
                calculated_at,
            }],
            score_override: None,
            last_updated: calculated_at,
        }
    }

    pub fn effective_score(&self) -> Points {
        effective_score(self)
    }

    /// Stamp a persisted change. `last_updated` is the repository's write token, so it
    /// moves strictly forward even when `at` is not later than the current value.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at.max(self.last_updated + Duration::nanoseconds(1));
    }
}

/// Append `breakdown` to the history and make it the current score. Timestamps never
/// move backwards: an `at` earlier than the newest entry is stamped with that entry's
/// time so the history stays ordered by `calculated_at`.
pub fn record_computation(
    mut record: CandidateRecord,
    breakdown: Breakdown,
    at: DateTime<Utc>,
) -> CandidateRecord {
    let calculated_at = record
        .history
        .last()
        .map_or(at, |last| at.max(last.calculated_at));

    record.current_score = breakdown.grand_total;
    record.history.push(HistoryEntry {
        score: breakdown.grand_total,
        breakdown: breakdown.clone(),
        calculated_at,
    });
    record.breakdown = breakdown;
    record.touch(calculated_at);
    record
}

/// Recompute with new inputs and record the result.
pub fn recalculate(
    record: CandidateRecord,
    inputs: Profile,
    engine: &CrsEngine,
    at: DateTime<Utc>,
) -> Result<CandidateRecord, CrsError> {
    let breakdown = engine.compute(&inputs)?;
    let mut updated = record_computation(record, breakdown, at);
    updated.inputs = inputs;
    Ok(updated)
}

/// Activate an override, replacing any previous one.
pub fn set_override(
    mut record: CandidateRecord,
    score: i64,
    reason: &str,
    author: &str,
    at: DateTime<Utc>,
    system_maximum: Points,
) -> Result<CandidateRecord, CrsError> {
    let score = Points::try_from(score)
        .ok()
        .filter(|value| *value <= system_maximum)
        .ok_or(CrsError::InvalidOverrideScore {
            score,
            maximum: system_maximum,
        })?;

    if reason.trim().is_empty() {
        return Err(CrsError::InvalidOverride { field: "reason" });
    }
    if author.trim().is_empty() {
        return Err(CrsError::InvalidOverride { field: "setBy" });
    }

    record.score_override = Some(Override::Active(OverrideDetails {
        score,
        reason: reason.trim().to_string(),
        set_by: author.trim().to_string(),
        set_at: at,
    }));
    Ok(record)
}

/// Deactivate the override while keeping its fields. No-op without an override.
pub fn disable_override(mut record: CandidateRecord) -> CandidateRecord {
    record.score_override = record
        .score_override
        .map(|value| Override::Inactive(value.into_details()));
    record
}

/// Re-activate a previously disabled override.
pub fn enable_override(mut record: CandidateRecord) -> Result<CandidateRecord, CrsError> {
    let details = record
        .score_override
        .take()
        .ok_or(CrsError::OverrideAbsent)?
        .into_details();
    record.score_override = Some(Override::Active(details));
    Ok(record)
}

/// Remove the override entirely.
pub fn clear_override(mut record: CandidateRecord) -> CandidateRecord {
    record.score_override = None;
    record
}

/// Score consumers should display: an active override, otherwise the computed score.
pub fn effective_score(record: &CandidateRecord) -> Points {
    match &record.score_override {
        Some(Override::Active(details)) => details.score,
        _ => record.current_score,
    }
}
