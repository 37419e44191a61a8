//! Comprehensive Ranking System scoring.
//!
//! `compute_crs` validates a profile, normalizes every language test, runs the four
//! category calculators and assembles a `Breakdown`. It performs no I/O and touches no
//! shared state; identical inputs always produce identical breakdowns.

pub mod breakdown;
pub mod domain;
pub mod error;
pub mod proficiency;
mod rules;
pub mod tables;
mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use breakdown::{
    AdditionalPoints, Breakdown, CoreHumanCapital, SkillTransferability, SpouseFactors,
};
pub use domain::{
    ArrangedEmployment, BonusFactors, CanadianStudy, EducationCredential, EducationLevel,
    EquivalencyAssessment, LanguageTestResult, MaritalStatus, NormalizedLanguages,
    NormalizedTest, OfficialLanguage, ProficiencyLevels, Profile, RawScores, Skill,
    SpouseProfile, TestType, WorkExperience,
};
pub use error::{CrsError, FieldViolation};
pub use proficiency::{normalize_proficiency, ConversionTables, SkillBands, TestBands};
pub use tables::{CombinationCaps, Points, ProfileLimits, ScoringTables, TableError};
pub use validation::validate_profile;

use proficiency::normalize_result;

/// Scoring engine bound to one validated, immutable table set.
#[derive(Debug, Clone)]
pub struct CrsEngine {
    tables: Arc<ScoringTables>,
}

impl CrsEngine {
    pub fn new(tables: ScoringTables) -> Result<Self, TableError> {
        tables.validate()?;
        Ok(Self {
            tables: Arc::new(tables),
        })
    }

    pub fn standard() -> Self {
        Self {
            tables: Arc::new(ScoringTables::standard()),
        }
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    pub fn system_maximum(&self) -> Points {
        self.tables.system_maximum
    }

    pub fn compute(&self, profile: &Profile) -> Result<Breakdown, CrsError> {
        compute_crs(profile, &self.tables)
    }

    pub fn normalize(
        &self,
        test: TestType,
        scores: &RawScores,
    ) -> Result<ProficiencyLevels, CrsError> {
        normalize_proficiency(&self.tables.conversion, test, scores)
    }
}

/// Score `profile` against `tables`. Fails before any lookup when the profile is
/// structurally invalid or a raw test score is outside its test's domain.
pub fn compute_crs(profile: &Profile, tables: &ScoringTables) -> Result<Breakdown, CrsError> {
    validate_profile(profile, &tables.limits)?;
    let languages = normalize_languages(profile, &tables.conversion)?;

    let core = rules::core_human_capital(profile, &languages, tables);
    let spouse = rules::spouse_factors(profile, &languages, tables)?;
    let transferability = rules::skill_transferability(profile, &languages, tables);
    let additional = rules::additional_points(profile, &languages, tables);

    Ok(Breakdown::assemble(
        core,
        spouse,
        transferability,
        additional,
        tables.system_maximum,
        tables.version.clone(),
    ))
}

/// Normalize the candidate's tests and, when a spouse accompanies, the spouse's test.
pub fn normalize_languages(
    profile: &Profile,
    conversion: &ConversionTables,
) -> Result<NormalizedLanguages, CrsError> {
    let normalize = |result: &LanguageTestResult| {
        normalize_result(conversion, result).map(|levels| NormalizedTest {
            test: result.test,
            levels,
        })
    };

    let first = normalize(&profile.first_language)?;
    let second = profile.second_language.as_ref().map(normalize).transpose()?;
    let spouse = profile
        .spouse
        .as_ref()
        .filter(|_| profile.has_accompanying_spouse)
        .and_then(|spouse| spouse.language.as_ref())
        .map(normalize)
        .transpose()?;

    Ok(NormalizedLanguages {
        first,
        second,
        spouse,
    })
}
