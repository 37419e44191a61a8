use std::fmt;

use crate::config::ConfigError;
use crate::ledger::{RepositoryError, ScoringServiceError};
use crate::scoring::{CrsError, TableError};
use crate::telemetry::TelemetryError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Tables(TableError),
    Scoring(CrsError),
    Repository(RepositoryError),
}

impl AppError {
    /// Errors caused by the caller's input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::Scoring(_) | AppError::Json(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Csv(err) => write!(f, "csv error: {}", err),
            AppError::Tables(err) => write!(f, "scoring table error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Repository(err) => write!(f, "store error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Tables(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Repository(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<TableError> for AppError {
    fn from(value: TableError) -> Self {
        Self::Tables(value)
    }
}

impl From<CrsError> for AppError {
    fn from(value: CrsError) -> Self {
        Self::Scoring(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<ScoringServiceError> for AppError {
    fn from(value: ScoringServiceError) -> Self {
        match value {
            ScoringServiceError::Scoring(err) => Self::Scoring(err),
            ScoringServiceError::Repository(err) => Self::Repository(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CandidateId;

    #[test]
    fn service_errors_are_flattened() {
        let err = AppError::from(ScoringServiceError::Scoring(CrsError::MissingSpouseProfile));
        assert!(matches!(err, AppError::Scoring(CrsError::MissingSpouseProfile)));
        assert!(err.is_input_error());

        let err = AppError::from(ScoringServiceError::Repository(RepositoryError::NotFound(
            CandidateId("cand-9".to_string()),
        )));
        assert_eq!(err.to_string(), "store error: candidate cand-9 not found");
        assert!(!err.is_input_error());
    }
}
