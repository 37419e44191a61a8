//! Immutable point tables.
//!
//! Every factor is an explicit key -> points table so each one can be verified on its own.
//! A `ScoringTables` value is built once (the standard set or a JSON document) and passed
//! to the engine; there is no process-wide registry.

mod standard;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::EducationLevel;
use super::proficiency::ConversionTables;

/// Point values and totals. Table entries are bounded by the system maximum, which is
/// itself bounded, so no sum of table entries can overflow.
pub type Points = u32;

/// Upper bound accepted for `ScoringTables::system_maximum`.
pub const SYSTEM_MAXIMUM_LIMIT: Points = 10_000;

/// Errors raised while loading or validating a table set.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read scoring tables: {0}")]
    Io(#[from] std::io::Error),
    #[error("scoring tables are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("table {table} is malformed: {reason}")]
    InvalidBands { table: String, reason: String },
    #[error("table {table} awards {points} points, above the system maximum {maximum}")]
    EntryAboveMaximum {
        table: String,
        points: Points,
        maximum: Points,
    },
    #[error("system maximum {0} is outside 1..={}", SYSTEM_MAXIMUM_LIMIT)]
    SystemMaximum(Points),
    #[error("table version must not be blank")]
    MissingVersion,
}

/// Step table over a small integer key: `base` covers every key below the first step,
/// so each key resolves to exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBands {
    pub base: Points,
    /// Ascending `(lower bound, points)` pairs.
    #[serde(default)]
    pub steps: Vec<(u8, Points)>,
}

impl PointBands {
    pub fn new(base: Points, steps: &[(u8, Points)]) -> Self {
        Self {
            base,
            steps: steps.to_vec(),
        }
    }

    pub fn lookup(&self, key: u8) -> Points {
        self.steps
            .iter()
            .rev()
            .find(|(from, _)| key >= *from)
            .map_or(self.base, |(_, points)| *points)
    }

    fn validate(&self, table: &str, maximum: Points) -> Result<(), TableError> {
        if self.steps.first().is_some_and(|(from, _)| *from == 0) {
            return Err(malformed(table, "first step must start above the base key 0"));
        }
        if self.steps.windows(2).any(|pair| pair[1].0 <= pair[0].0) {
            return Err(malformed(table, "step bounds must be strictly ascending"));
        }

        std::iter::once(self.base)
            .chain(self.steps.iter().map(|(_, points)| *points))
            .try_for_each(|points| check_entry(table, points, maximum))
    }
}

/// Education points, one field per credential level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPoints {
    pub less_than_secondary: Points,
    pub secondary: Points,
    pub one_year_post_secondary: Points,
    pub two_year_post_secondary: Points,
    pub bachelors: Points,
    pub two_or_more_credentials: Points,
    pub masters: Points,
    pub doctoral: Points,
}

impl EducationPoints {
    pub fn lookup(&self, level: EducationLevel) -> Points {
        match level {
            EducationLevel::LessThanSecondary => self.less_than_secondary,
            EducationLevel::Secondary => self.secondary,
            EducationLevel::OneYearPostSecondary => self.one_year_post_secondary,
            EducationLevel::TwoYearPostSecondary => self.two_year_post_secondary,
            EducationLevel::Bachelors => self.bachelors,
            EducationLevel::TwoOrMoreCredentials => self.two_or_more_credentials,
            EducationLevel::Masters => self.masters,
            EducationLevel::Doctoral => self.doctoral,
        }
    }

    fn validate(&self, table: &str, maximum: Points) -> Result<(), TableError> {
        EducationLevel::ALL
            .iter()
            .try_for_each(|level| check_entry(table, self.lookup(*level), maximum))
    }
}

/// Two-dimensional combination table. Rows key on an experience or education ordinal,
/// columns on a language level or Canadian work years; a key below the first row or
/// column bound earns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationTable {
    /// Ascending column lower bounds.
    pub columns: Vec<u8>,
    /// Ascending `(row lower bound, points per column)` rows.
    pub rows: Vec<(u8, Vec<Points>)>,
}

impl CombinationTable {
    pub fn new<const N: usize>(columns: &[u8], rows: &[(u8, [Points; N])]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: rows
                .iter()
                .map(|(from, points)| (*from, points.to_vec()))
                .collect(),
        }
    }

    pub fn lookup(&self, row_key: u8, column_key: u8) -> Points {
        let Some((_, row)) = self.rows.iter().rev().find(|(from, _)| row_key >= *from) else {
            return 0;
        };
        let Some(column) = self.columns.iter().rposition(|from| column_key >= *from) else {
            return 0;
        };
        row.get(column).copied().unwrap_or(0)
    }

    fn validate(&self, table: &str, maximum: Points) -> Result<(), TableError> {
        if self.columns.is_empty() || self.rows.is_empty() {
            return Err(malformed(table, "needs at least one row and one column"));
        }
        if self.columns.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(malformed(table, "column bounds must be strictly ascending"));
        }
        if self.rows.windows(2).any(|pair| pair[1].0 <= pair[0].0) {
            return Err(malformed(table, "row bounds must be strictly ascending"));
        }
        if self
            .rows
            .iter()
            .any(|(_, points)| points.len() != self.columns.len())
        {
            return Err(malformed(table, "every row needs one value per column"));
        }

        self.rows
            .iter()
            .flat_map(|(_, points)| points.iter().copied())
            .try_for_each(|points| check_entry(table, points, maximum))
    }
}

/// Core human capital tables for one marital situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorTables {
    pub age: PointBands,
    pub education: EducationPoints,
    /// Keyed by the minimum first-language level.
    pub first_language: PointBands,
    /// Keyed by the minimum second-language level.
    pub second_language: PointBands,
    pub canadian_work: PointBands,
}

impl FactorTables {
    fn validate(&self, table: &str, maximum: Points) -> Result<(), TableError> {
        self.age.validate(&format!("{table}.age"), maximum)?;
        self.education
            .validate(&format!("{table}.education"), maximum)?;
        self.first_language
            .validate(&format!("{table}.firstLanguage"), maximum)?;
        self.second_language
            .validate(&format!("{table}.secondLanguage"), maximum)?;
        self.canadian_work
            .validate(&format!("{table}.canadianWork"), maximum)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpouseTables {
    pub education: EducationPoints,
    pub language: PointBands,
    pub canadian_work: PointBands,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferabilityTables {
    /// Rows: education rank. Columns: minimum first-language level.
    pub education_language: CombinationTable,
    /// Rows: education rank. Columns: Canadian work years.
    pub education_canadian_work: CombinationTable,
    /// Rows: foreign work years. Columns: minimum first-language level.
    pub foreign_work_language: CombinationTable,
    /// Rows: foreign work years. Columns: Canadian work years.
    pub foreign_work_canadian_work: CombinationTable,
    /// Rows: certificate held (0/1). Columns: minimum first-language level.
    pub certificate_language: CombinationTable,
    pub combination_caps: CombinationCaps,
    /// Cap on each of the education pair, the foreign work pair and the certificate
    /// combination.
    pub group_cap: Points,
    pub category_cap: Points,
}

/// Sub-maximum of each transferability combination, applied to the looked-up value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationCaps {
    pub education_language: Points,
    pub education_canadian_work: Points,
    pub foreign_work_language: Points,
    pub foreign_work_canadian_work: Points,
    pub certificate_language: Points,
}

impl CombinationCaps {
    pub const fn uniform(cap: Points) -> Self {
        Self {
            education_language: cap,
            education_canadian_work: cap,
            foreign_work_language: cap,
            foreign_work_canadian_work: cap,
            certificate_language: cap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalTables {
    pub provincial_nomination: Points,
    pub arranged_employment_senior: Points,
    pub arranged_employment_other: Points,
    pub canadian_study_short: Points,
    pub canadian_study_long: Points,
    pub sibling_in_canada: Points,
    /// Strong French plus at least functional English.
    pub french_with_english: Points,
    pub french_only: Points,
    /// NCLC level every French skill must reach.
    pub french_threshold: u8,
    /// CLB level every English skill must reach for the higher French bonus.
    pub english_threshold: u8,
}

/// Structural limits checked before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLimits {
    pub min_age: u8,
    pub max_age: u8,
    pub max_canadian_years: u8,
    pub max_foreign_years: u8,
}

/// Complete, versioned table set handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringTables {
    pub version: String,
    pub system_maximum: Points,
    /// Highest level an unassessed foreign credential is scored as.
    pub unassessed_foreign_ceiling: EducationLevel,
    pub limits: ProfileLimits,
    pub with_spouse: FactorTables,
    pub without_spouse: FactorTables,
    pub spouse: SpouseTables,
    pub transferability: TransferabilityTables,
    pub additional: AdditionalTables,
    pub conversion: ConversionTables,
}

impl ScoringTables {
    /// Table set selected by the accompanying-spouse flag.
    pub fn factors(&self, has_accompanying_spouse: bool) -> &FactorTables {
        if has_accompanying_spouse {
            &self.with_spouse
        } else {
            &self.without_spouse
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Parse a JSON table document and validate it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let tables: ScoringTables = serde_json::from_reader(reader)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.version.trim().is_empty() {
            return Err(TableError::MissingVersion);
        }
        if self.system_maximum == 0 || self.system_maximum > SYSTEM_MAXIMUM_LIMIT {
            return Err(TableError::SystemMaximum(self.system_maximum));
        }
        if self.limits.min_age > self.limits.max_age {
            return Err(malformed("limits", "minimum age exceeds maximum age"));
        }

        let maximum = self.system_maximum;
        self.with_spouse.validate("withSpouse", maximum)?;
        self.without_spouse.validate("withoutSpouse", maximum)?;

        self.spouse
            .education
            .validate("spouse.education", maximum)?;
        self.spouse.language.validate("spouse.language", maximum)?;
        self.spouse
            .canadian_work
            .validate("spouse.canadianWork", maximum)?;

        let transfer = &self.transferability;
        transfer
            .education_language
            .validate("transferability.educationLanguage", maximum)?;
        transfer
            .education_canadian_work
            .validate("transferability.educationCanadianWork", maximum)?;
        transfer
            .foreign_work_language
            .validate("transferability.foreignWorkLanguage", maximum)?;
        transfer
            .foreign_work_canadian_work
            .validate("transferability.foreignWorkCanadianWork", maximum)?;
        transfer
            .certificate_language
            .validate("transferability.certificateLanguage", maximum)?;
        let caps = &transfer.combination_caps;
        for (name, cap) in [
            ("combinationCaps.educationLanguage", caps.education_language),
            ("combinationCaps.educationCanadianWork", caps.education_canadian_work),
            ("combinationCaps.foreignWorkLanguage", caps.foreign_work_language),
            ("combinationCaps.foreignWorkCanadianWork", caps.foreign_work_canadian_work),
            ("combinationCaps.certificateLanguage", caps.certificate_language),
            ("groupCap", transfer.group_cap),
            ("categoryCap", transfer.category_cap),
        ] {
            check_entry(&format!("transferability.{name}"), cap, maximum)?;
        }

        let additional = &self.additional;
        for (name, points) in [
            ("provincialNomination", additional.provincial_nomination),
            ("arrangedEmploymentSenior", additional.arranged_employment_senior),
            ("arrangedEmploymentOther", additional.arranged_employment_other),
            ("canadianStudyShort", additional.canadian_study_short),
            ("canadianStudyLong", additional.canadian_study_long),
            ("siblingInCanada", additional.sibling_in_canada),
            ("frenchWithEnglish", additional.french_with_english),
            ("frenchOnly", additional.french_only),
        ] {
            check_entry(&format!("additional.{name}"), points, maximum)?;
        }

        self.conversion.validate()
    }
}

fn malformed(table: &str, reason: &str) -> TableError {
    TableError::InvalidBands {
        table: table.to_string(),
        reason: reason.to_string(),
    }
}

fn check_entry(table: &str, points: Points, maximum: Points) -> Result<(), TableError> {
    if points > maximum {
        return Err(TableError::EntryAboveMaximum {
            table: table.to_string(),
            points,
            maximum,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_bands_resolve_every_key() {
        let bands = PointBands::new(0, &[(1, 40), (2, 53), (5, 80)]);
        assert_eq!(bands.lookup(0), 0);
        assert_eq!(bands.lookup(1), 40);
        assert_eq!(bands.lookup(4), 53);
        assert_eq!(bands.lookup(5), 80);
        assert_eq!(bands.lookup(u8::MAX), 80);
    }

    #[test]
    fn point_bands_reject_unsorted_steps() {
        let bands = PointBands::new(0, &[(5, 10), (3, 20)]);
        assert!(matches!(
            bands.validate("test", 1200),
            Err(TableError::InvalidBands { .. })
        ));
    }

    #[test]
    fn combination_lookup_respects_both_bounds() {
        let table = CombinationTable::new(&[7, 9], &[(2, [13, 25]), (5, [25, 50])]);
        assert_eq!(table.lookup(1, 10), 0);
        assert_eq!(table.lookup(2, 6), 0);
        assert_eq!(table.lookup(2, 7), 13);
        assert_eq!(table.lookup(4, 9), 25);
        assert_eq!(table.lookup(7, 10), 50);
    }

    #[test]
    fn combination_rows_must_match_columns() {
        let table = CombinationTable::new(&[7, 9], &[(1, [13])]);
        assert!(table.validate("test", 1200).is_err());
    }

    #[test]
    fn entries_above_system_maximum_are_rejected() {
        let mut tables = ScoringTables::standard();
        tables.additional.provincial_nomination = tables.system_maximum + 1;
        assert!(matches!(
            tables.validate(),
            Err(TableError::EntryAboveMaximum { .. })
        ));
    }

    #[test]
    fn blank_version_is_rejected() {
        let mut tables = ScoringTables::standard();
        tables.version = "  ".to_string();
        assert!(matches!(tables.validate(), Err(TableError::MissingVersion)));
    }

    #[test]
    fn json_round_trip_preserves_tables() {
        let tables = ScoringTables::standard();
        let json = serde_json::to_vec(&tables).expect("tables serialize");
        let loaded = ScoringTables::from_reader(json.as_slice()).expect("tables load");
        assert_eq!(loaded, tables);
    }

    #[test]
    fn spouse_flag_selects_parallel_table_set() {
        let tables = ScoringTables::standard();
        assert_eq!(tables.factors(true).age.lookup(29), 100);
        assert_eq!(tables.factors(false).age.lookup(29), 110);
    }
}
