use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Candidate profile supplied by the caller. Proficiency levels are never part of the
/// input; they are derived from the raw test scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub has_accompanying_spouse: bool,
    pub first_language: LanguageTestResult,
    #[serde(default)]
    pub second_language: Option<LanguageTestResult>,
    pub education: EducationCredential,
    #[serde(default)]
    pub trade_certificate: bool,
    pub work: WorkExperience,
    #[serde(default)]
    pub bonus: BonusFactors,
    #[serde(default)]
    pub spouse: Option<SpouseProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    CommonLaw,
    Separated,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Only married and common-law candidates can declare an accompanying spouse.
    pub const fn has_partner(self) -> bool {
        matches!(self, MaritalStatus::Married | MaritalStatus::CommonLaw)
    }

    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::CommonLaw => "common_law",
            MaritalStatus::Separated => "separated",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Widowed => "widowed",
        }
    }
}

/// Accepted language tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    IeltsGeneral,
    CelpipGeneral,
    TefCanada,
    TcfCanada,
}

impl TestType {
    pub const ALL: [TestType; 4] = [
        TestType::IeltsGeneral,
        TestType::CelpipGeneral,
        TestType::TefCanada,
        TestType::TcfCanada,
    ];

    pub const fn language(self) -> OfficialLanguage {
        match self {
            TestType::IeltsGeneral | TestType::CelpipGeneral => OfficialLanguage::English,
            TestType::TefCanada | TestType::TcfCanada => OfficialLanguage::French,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TestType::IeltsGeneral => "IELTS General Training",
            TestType::CelpipGeneral => "CELPIP-General",
            TestType::TefCanada => "TEF Canada",
            TestType::TcfCanada => "TCF Canada",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficialLanguage {
    English,
    French,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Reading,
    Listening,
    Speaking,
    Writing,
}

impl Skill {
    pub const ALL: [Skill; 4] = [Skill::Reading, Skill::Listening, Skill::Speaking, Skill::Writing];

    pub const fn label(self) -> &'static str {
        match self {
            Skill::Reading => "reading",
            Skill::Listening => "listening",
            Skill::Speaking => "speaking",
            Skill::Writing => "writing",
        }
    }
}

/// Raw result of a single language test, as printed on the test report form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageTestResult {
    pub test: TestType,
    pub scores: RawScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    pub reading: f64,
    pub listening: f64,
    pub speaking: f64,
    pub writing: f64,
}

impl RawScores {
    pub fn get(&self, skill: Skill) -> f64 {
        match skill {
            Skill::Reading => self.reading,
            Skill::Listening => self.listening,
            Skill::Speaking => self.speaking,
            Skill::Writing => self.writing,
        }
    }
}

/// Standardized benchmark levels (CLB for English, NCLC for French), one per skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyLevels {
    pub reading: u8,
    pub listening: u8,
    pub speaking: u8,
    pub writing: u8,
}

impl ProficiencyLevels {
    pub const fn uniform(level: u8) -> Self {
        Self {
            reading: level,
            listening: level,
            speaking: level,
            writing: level,
        }
    }

    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Reading => self.reading,
            Skill::Listening => self.listening,
            Skill::Speaking => self.speaking,
            Skill::Writing => self.writing,
        }
    }

    /// Lowest level across the four skills; benchmark tiers key on it.
    pub fn minimum(&self) -> u8 {
        self.reading
            .min(self.listening)
            .min(self.speaking)
            .min(self.writing)
    }

    pub fn all_at_least(&self, level: u8) -> bool {
        self.minimum() >= level
    }
}

/// Highest completed credential, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    LessThanSecondary,
    Secondary,
    OneYearPostSecondary,
    TwoYearPostSecondary,
    Bachelors,
    TwoOrMoreCredentials,
    Masters,
    Doctoral,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 8] = [
        EducationLevel::LessThanSecondary,
        EducationLevel::Secondary,
        EducationLevel::OneYearPostSecondary,
        EducationLevel::TwoYearPostSecondary,
        EducationLevel::Bachelors,
        EducationLevel::TwoOrMoreCredentials,
        EducationLevel::Masters,
        EducationLevel::Doctoral,
    ];

    /// Ordinal used as the row key of the education combination tables.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::LessThanSecondary => "less than secondary school",
            EducationLevel::Secondary => "secondary diploma",
            EducationLevel::OneYearPostSecondary => "one-year post-secondary program",
            EducationLevel::TwoYearPostSecondary => "two-year post-secondary program",
            EducationLevel::Bachelors => "bachelor's degree or three-year program",
            EducationLevel::TwoOrMoreCredentials => "two or more post-secondary credentials",
            EducationLevel::Masters => "master's or professional degree",
            EducationLevel::Doctoral => "doctoral degree",
        }
    }
}

/// Credential plus the equivalency assessment (ECA) backing a foreign credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationCredential {
    pub level: EducationLevel,
    #[serde(default)]
    pub foreign: bool,
    #[serde(default)]
    pub equivalency: Option<EquivalencyAssessment>,
}

impl EducationCredential {
    pub fn canadian(level: EducationLevel) -> Self {
        Self {
            level,
            foreign: false,
            equivalency: None,
        }
    }

    pub fn has_equivalency(&self) -> bool {
        !self.foreign || self.equivalency.is_some()
    }

    /// Level that scoring is allowed to use: a foreign credential without an
    /// assessment never scores above `ceiling`.
    pub fn scored_level(&self, ceiling: EducationLevel) -> EducationLevel {
        if self.has_equivalency() {
            self.level
        } else {
            self.level.min(ceiling)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalencyAssessment {
    pub assessed_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub canadian_years: u8,
    pub foreign_years: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusFactors {
    #[serde(default)]
    pub provincial_nomination: bool,
    #[serde(default)]
    pub arranged_employment: ArrangedEmployment,
    #[serde(default)]
    pub canadian_study: CanadianStudy,
    #[serde(default)]
    pub sibling_in_canada: bool,
    #[serde(default)]
    pub french_bonus_eligible: bool,
}

/// Qualifying job offer, split by occupation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrangedEmployment {
    #[default]
    None,
    SeniorManagement,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanadianStudy {
    #[default]
    None,
    OneOrTwoYears,
    ThreeOrMoreYears,
}

/// Accompanying spouse or common-law partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpouseProfile {
    pub age: u8,
    pub education: EducationCredential,
    #[serde(default)]
    pub language: Option<LanguageTestResult>,
    #[serde(default)]
    pub canadian_years: u8,
}

/// Normalized result of one test, kept alongside the test that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedTest {
    pub test: TestType,
    pub levels: ProficiencyLevels,
}

impl NormalizedTest {
    pub fn language(&self) -> OfficialLanguage {
        self.test.language()
    }
}

/// Every test in a profile, normalized before any point lookup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedLanguages {
    pub first: NormalizedTest,
    pub second: Option<NormalizedTest>,
    pub spouse: Option<NormalizedTest>,
}

impl NormalizedLanguages {
    /// Candidate's own result in the given official language, if tested.
    pub fn candidate_result(&self, language: OfficialLanguage) -> Option<&NormalizedTest> {
        std::iter::once(&self.first)
            .chain(self.second.iter())
            .find(|result| result.language() == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_credential_without_assessment_is_capped() {
        let credential = EducationCredential {
            level: EducationLevel::Masters,
            foreign: true,
            equivalency: None,
        };
        assert_eq!(
            credential.scored_level(EducationLevel::Secondary),
            EducationLevel::Secondary
        );

        let assessed = EducationCredential {
            equivalency: Some(EquivalencyAssessment {
                assessed_on: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
                organization: Some("WES".to_string()),
            }),
            ..credential
        };
        assert_eq!(
            assessed.scored_level(EducationLevel::Secondary),
            EducationLevel::Masters
        );
    }

    #[test]
    fn ceiling_never_raises_a_lower_credential() {
        let credential = EducationCredential {
            level: EducationLevel::LessThanSecondary,
            foreign: true,
            equivalency: None,
        };
        assert_eq!(
            credential.scored_level(EducationLevel::Secondary),
            EducationLevel::LessThanSecondary
        );
    }

    #[test]
    fn minimum_level_uses_weakest_skill() {
        let levels = ProficiencyLevels {
            reading: 9,
            listening: 7,
            speaking: 10,
            writing: 8,
        };
        assert_eq!(levels.minimum(), 7);
        assert!(levels.all_at_least(7));
        assert!(!levels.all_at_least(8));
    }

    #[test]
    fn profile_deserializes_with_defaults() {
        let json = r#"{
            "age": 29,
            "maritalStatus": "single",
            "hasAccompanyingSpouse": false,
            "firstLanguage": {
                "test": "ielts_general",
                "scores": { "reading": 7.0, "listening": 8.0, "speaking": 7.0, "writing": 7.0 }
            },
            "education": { "level": "masters" },
            "work": { "canadianYears": 3, "foreignYears": 0 }
        }"#;

        let profile: Profile = serde_json::from_str(json).expect("profile parses");
        assert_eq!(profile.age, 29);
        assert!(profile.second_language.is_none());
        assert!(profile.spouse.is_none());
        assert_eq!(profile.bonus, BonusFactors::default());
        assert!(profile.education.has_equivalency());
    }
}
