use crate::scoring::breakdown::SpouseFactors;
use crate::scoring::domain::{NormalizedLanguages, Profile};
use crate::scoring::error::CrsError;
use crate::scoring::tables::ScoringTables;

pub(crate) fn spouse_factors(
    profile: &Profile,
    languages: &NormalizedLanguages,
    tables: &ScoringTables,
) -> Result<SpouseFactors, CrsError> {
    if !profile.has_accompanying_spouse {
        return Ok(SpouseFactors::default());
    }

    let spouse = profile
        .spouse
        .as_ref()
        .ok_or(CrsError::MissingSpouseProfile)?;
    let spouse_tables = &tables.spouse;

    let education_level = spouse
        .education
        .scored_level(tables.unassessed_foreign_ceiling);
    let language = languages.spouse.map_or(0, |result| {
        spouse_tables.language.lookup(result.levels.minimum())
    });

    Ok(SpouseFactors::new(
        spouse_tables.education.lookup(education_level),
        language,
        spouse_tables.canadian_work.lookup(spouse.canadian_years),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{
        EducationCredential, EducationLevel, LanguageTestResult, MaritalStatus, NormalizedTest,
        ProficiencyLevels, RawScores, SpouseProfile, TestType, WorkExperience,
    };

    fn ielts_nine() -> LanguageTestResult {
        LanguageTestResult {
            test: TestType::IeltsGeneral,
            scores: RawScores {
                reading: 7.0,
                listening: 8.0,
                speaking: 7.0,
                writing: 7.0,
            },
        }
    }

    fn married_profile(spouse: Option<SpouseProfile>) -> Profile {
        Profile {
            age: 33,
            marital_status: MaritalStatus::Married,
            has_accompanying_spouse: true,
            first_language: ielts_nine(),
            second_language: None,
            education: EducationCredential::canadian(EducationLevel::Bachelors),
            trade_certificate: false,
            work: WorkExperience::default(),
            bonus: Default::default(),
            spouse,
        }
    }

    fn languages(spouse_level: Option<u8>) -> NormalizedLanguages {
        NormalizedLanguages {
            first: NormalizedTest {
                test: TestType::IeltsGeneral,
                levels: ProficiencyLevels::uniform(9),
            },
            second: None,
            spouse: spouse_level.map(|level| NormalizedTest {
                test: TestType::IeltsGeneral,
                levels: ProficiencyLevels::uniform(level),
            }),
        }
    }

    #[test]
    fn no_accompanying_spouse_scores_zero() {
        let tables = ScoringTables::standard();
        let mut profile = married_profile(None);
        profile.has_accompanying_spouse = false;

        let factors = spouse_factors(&profile, &languages(None), &tables).expect("scores");
        assert_eq!(factors, SpouseFactors::default());
        assert_eq!(factors.total, 0);
    }

    #[test]
    fn missing_spouse_profile_is_a_contract_violation() {
        let tables = ScoringTables::standard();
        let err = spouse_factors(&married_profile(None), &languages(None), &tables)
            .expect_err("spouse profile is required");
        assert_eq!(err, CrsError::MissingSpouseProfile);
    }

    #[test]
    fn spouse_tables_score_each_factor() {
        let tables = ScoringTables::standard();
        let profile = married_profile(Some(SpouseProfile {
            age: 31,
            education: EducationCredential::canadian(EducationLevel::Masters),
            language: Some(ielts_nine()),
            canadian_years: 2,
        }));

        let factors = spouse_factors(&profile, &languages(Some(9)), &tables).expect("scores");
        assert_eq!(factors.education, 10);
        assert_eq!(factors.language, 20);
        assert_eq!(factors.canadian_work, 7);
        assert_eq!(factors.total, 37);
    }

    #[test]
    fn untested_spouse_earns_no_language_points() {
        let tables = ScoringTables::standard();
        let profile = married_profile(Some(SpouseProfile {
            age: 31,
            education: EducationCredential::canadian(EducationLevel::Secondary),
            language: None,
            canadian_years: 0,
        }));

        let factors = spouse_factors(&profile, &languages(None), &tables).expect("scores");
        assert_eq!(factors.language, 0);
        assert_eq!(factors.total, 2);
    }
}
