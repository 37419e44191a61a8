use crate::scoring::breakdown::CoreHumanCapital;
use crate::scoring::domain::{NormalizedLanguages, Profile};
use crate::scoring::tables::ScoringTables;

pub(crate) fn core_human_capital(
    profile: &Profile,
    languages: &NormalizedLanguages,
    tables: &ScoringTables,
) -> CoreHumanCapital {
    let factors = tables.factors(profile.has_accompanying_spouse);
    let education_level = profile
        .education
        .scored_level(tables.unassessed_foreign_ceiling);

    let second_language = languages.second.map_or(0, |second| {
        factors.second_language.lookup(second.levels.minimum())
    });

    CoreHumanCapital::new(
        factors.age.lookup(profile.age),
        factors.education.lookup(education_level),
        factors.first_language.lookup(languages.first.levels.minimum()),
        second_language,
        factors.canadian_work.lookup(profile.work.canadian_years),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{
        EducationCredential, EducationLevel, LanguageTestResult, MaritalStatus, NormalizedTest,
        ProficiencyLevels, RawScores, TestType, WorkExperience,
    };

    fn profile(has_spouse: bool) -> Profile {
        Profile {
            age: 29,
            marital_status: if has_spouse {
                MaritalStatus::Married
            } else {
                MaritalStatus::Single
            },
            has_accompanying_spouse: has_spouse,
            first_language: LanguageTestResult {
                test: TestType::CelpipGeneral,
                scores: RawScores {
                    reading: 9.0,
                    listening: 9.0,
                    speaking: 9.0,
                    writing: 9.0,
                },
            },
            second_language: None,
            education: EducationCredential::canadian(EducationLevel::Masters),
            trade_certificate: false,
            work: WorkExperience {
                canadian_years: 3,
                foreign_years: 0,
            },
            bonus: Default::default(),
            spouse: None,
        }
    }

    fn languages(first: u8, second: Option<u8>) -> NormalizedLanguages {
        NormalizedLanguages {
            first: NormalizedTest {
                test: TestType::CelpipGeneral,
                levels: ProficiencyLevels::uniform(first),
            },
            second: second.map(|level| NormalizedTest {
                test: TestType::TefCanada,
                levels: ProficiencyLevels::uniform(level),
            }),
            spouse: None,
        }
    }

    #[test]
    fn single_candidate_uses_without_spouse_tables() {
        let tables = ScoringTables::standard();
        let core = core_human_capital(&profile(false), &languages(9, None), &tables);

        assert_eq!(core.age, 110);
        assert_eq!(core.education, 135);
        assert_eq!(core.first_language, 124);
        assert_eq!(core.second_language, 0);
        assert_eq!(core.canadian_work, 64);
        assert_eq!(core.total, 433);
    }

    #[test]
    fn accompanied_candidate_uses_with_spouse_tables() {
        let tables = ScoringTables::standard();
        let core = core_human_capital(&profile(true), &languages(9, None), &tables);

        assert_eq!(core.age, 100);
        assert_eq!(core.education, 126);
        assert_eq!(core.first_language, 116);
        assert_eq!(core.canadian_work, 56);
        assert_eq!(core.total, 398);
    }

    #[test]
    fn second_language_scores_only_when_tested() {
        let tables = ScoringTables::standard();
        let core = core_human_capital(&profile(false), &languages(9, Some(7)), &tables);
        assert_eq!(core.second_language, 12);
        assert_eq!(core.total, 445);
    }

    #[test]
    fn weakest_skill_sets_the_language_tier() {
        let tables = ScoringTables::standard();
        let mut normalized = languages(10, None);
        normalized.first.levels.writing = 7;
        let core = core_human_capital(&profile(false), &normalized, &tables);
        assert_eq!(core.first_language, 68);
    }

    #[test]
    fn unassessed_foreign_masters_scores_as_secondary() {
        let tables = ScoringTables::standard();
        let mut candidate = profile(false);
        candidate.education = EducationCredential {
            level: EducationLevel::Masters,
            foreign: true,
            equivalency: None,
        };
        let core = core_human_capital(&candidate, &languages(9, None), &tables);
        assert_eq!(core.education, 30);
    }
}
