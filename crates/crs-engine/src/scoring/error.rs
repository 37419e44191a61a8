use std::fmt;

use serde::Serialize;

use super::domain::{Skill, TestType};
use super::tables::Points;

/// Validation failures raised before any point lookup runs. The engine never returns a
/// partially computed breakdown.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrsError {
    #[error("invalid profile: {}", join_violations(.violations))]
    InvalidProfile { violations: Vec<FieldViolation> },
    #[error("{} {} score {score} is outside the accepted range", .test.label(), .skill.label())]
    InvalidTestScore {
        test: TestType,
        skill: Skill,
        score: f64,
    },
    #[error("an accompanying spouse was declared without a spouse profile")]
    MissingSpouseProfile,
    #[error("override score {score} must be between 0 and {maximum}")]
    InvalidOverrideScore { score: i64, maximum: Points },
    #[error("override {field} must not be blank")]
    InvalidOverride { field: &'static str },
    #[error("no override is recorded for this candidate")]
    OverrideAbsent,
}

impl CrsError {
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            CrsError::InvalidProfile { violations } => violations,
            _ => &[],
        }
    }
}

/// Single offending field, addressed with the profile's serialized field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_profile_lists_every_field() {
        let err = CrsError::InvalidProfile {
            violations: vec![
                FieldViolation::new("age", "must be between 16 and 100"),
                FieldViolation::new("work.canadianYears", "must not exceed 5"),
            ],
        };

        let message = err.to_string();
        assert!(message.contains("age must be between 16 and 100"));
        assert!(message.contains("work.canadianYears must not exceed 5"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_score_message_names_test_and_skill() {
        let err = CrsError::InvalidTestScore {
            test: TestType::IeltsGeneral,
            skill: Skill::Listening,
            score: 3.5,
        };
        assert_eq!(
            err.to_string(),
            "IELTS General Training listening score 3.5 is outside the accepted range"
        );
    }
}
