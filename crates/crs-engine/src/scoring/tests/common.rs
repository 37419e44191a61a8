use chrono::NaiveDate;

use crate::scoring::domain::{
    BonusFactors, EducationCredential, EducationLevel, EquivalencyAssessment, LanguageTestResult,
    MaritalStatus, Profile, RawScores, SpouseProfile, TestType, WorkExperience,
};
use crate::scoring::ScoringTables;

pub(super) fn tables() -> ScoringTables {
    ScoringTables::standard()
}

pub(super) fn scores(reading: f64, listening: f64, speaking: f64, writing: f64) -> RawScores {
    RawScores {
        reading,
        listening,
        speaking,
        writing,
    }
}

/// IELTS General result normalizing to CLB 9 in every skill.
pub(super) fn ielts_clb9() -> LanguageTestResult {
    LanguageTestResult {
        test: TestType::IeltsGeneral,
        scores: scores(7.0, 8.0, 7.0, 7.0),
    }
}

pub(super) fn celpip(level: f64) -> LanguageTestResult {
    LanguageTestResult {
        test: TestType::CelpipGeneral,
        scores: scores(level, level, level, level),
    }
}

/// TEF Canada result normalizing to NCLC 7 in every skill.
pub(super) fn tef_nclc7() -> LanguageTestResult {
    LanguageTestResult {
        test: TestType::TefCanada,
        scores: scores(207.0, 249.0, 310.0, 310.0),
    }
}

pub(super) fn assessed_foreign(level: EducationLevel) -> EducationCredential {
    EducationCredential {
        level,
        foreign: true,
        equivalency: Some(EquivalencyAssessment {
            assessed_on: NaiveDate::from_ymd_opt(2024, 2, 12).expect("valid date"),
            organization: Some("WES".to_string()),
        }),
    }
}

/// Single 29-year-old with an assessed master's degree, CLB 9 and three years of
/// Canadian work.
pub(super) fn single_masters() -> Profile {
    Profile {
        age: 29,
        marital_status: MaritalStatus::Single,
        has_accompanying_spouse: false,
        first_language: ielts_clb9(),
        second_language: None,
        education: assessed_foreign(EducationLevel::Masters),
        trade_certificate: false,
        work: WorkExperience {
            canadian_years: 3,
            foreign_years: 0,
        },
        bonus: BonusFactors::default(),
        spouse: None,
    }
}

pub(super) fn spouse() -> SpouseProfile {
    SpouseProfile {
        age: 31,
        education: EducationCredential::canadian(EducationLevel::Bachelors),
        language: Some(celpip(7.0)),
        canadian_years: 1,
    }
}

pub(super) fn married_with_spouse() -> Profile {
    Profile {
        marital_status: MaritalStatus::Married,
        has_accompanying_spouse: true,
        spouse: Some(spouse()),
        ..single_masters()
    }
}
