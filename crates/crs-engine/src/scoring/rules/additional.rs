use crate::scoring::breakdown::AdditionalPoints;
use crate::scoring::domain::{
    ArrangedEmployment, CanadianStudy, NormalizedLanguages, OfficialLanguage, Profile,
};
use crate::scoring::tables::{AdditionalTables, Points, ScoringTables};

pub(crate) fn additional_points(
    profile: &Profile,
    languages: &NormalizedLanguages,
    tables: &ScoringTables,
) -> AdditionalPoints {
    let grid = &tables.additional;
    let bonus = &profile.bonus;

    let provincial_nomination = if bonus.provincial_nomination {
        grid.provincial_nomination
    } else {
        0
    };

    let arranged_employment = match bonus.arranged_employment {
        ArrangedEmployment::None => 0,
        ArrangedEmployment::SeniorManagement => grid.arranged_employment_senior,
        ArrangedEmployment::Other => grid.arranged_employment_other,
    };

    let canadian_study = match bonus.canadian_study {
        CanadianStudy::None => 0,
        CanadianStudy::OneOrTwoYears => grid.canadian_study_short,
        CanadianStudy::ThreeOrMoreYears => grid.canadian_study_long,
    };

    let sibling_in_canada = if bonus.sibling_in_canada {
        grid.sibling_in_canada
    } else {
        0
    };

    let french_language = if bonus.french_bonus_eligible {
        french_bonus(languages, grid)
    } else {
        0
    };

    AdditionalPoints::new(
        provincial_nomination,
        arranged_employment,
        canadian_study,
        sibling_in_canada,
        french_language,
    )
}

fn french_bonus(languages: &NormalizedLanguages, grid: &AdditionalTables) -> Points {
    let strong_french = languages
        .candidate_result(OfficialLanguage::French)
        .is_some_and(|french| french.levels.all_at_least(grid.french_threshold));
    if !strong_french {
        return 0;
    }

    let functional_english = languages
        .candidate_result(OfficialLanguage::English)
        .is_some_and(|english| english.levels.all_at_least(grid.english_threshold));

    if functional_english {
        grid.french_with_english
    } else {
        grid.french_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{
        BonusFactors, EducationCredential, EducationLevel, LanguageTestResult, MaritalStatus,
        NormalizedTest, ProficiencyLevels, RawScores, TestType, WorkExperience,
    };

    fn profile(bonus: BonusFactors) -> Profile {
        Profile {
            age: 30,
            marital_status: MaritalStatus::Single,
            has_accompanying_spouse: false,
            first_language: LanguageTestResult {
                test: TestType::TefCanada,
                scores: RawScores {
                    reading: 233.0,
                    listening: 280.0,
                    speaking: 349.0,
                    writing: 349.0,
                },
            },
            second_language: None,
            education: EducationCredential::canadian(EducationLevel::Bachelors),
            trade_certificate: false,
            work: WorkExperience::default(),
            bonus,
            spouse: None,
        }
    }

    fn french_first(french: u8, english: Option<u8>) -> NormalizedLanguages {
        NormalizedLanguages {
            first: NormalizedTest {
                test: TestType::TefCanada,
                levels: ProficiencyLevels::uniform(french),
            },
            second: english.map(|level| NormalizedTest {
                test: TestType::IeltsGeneral,
                levels: ProficiencyLevels::uniform(level),
            }),
            spouse: None,
        }
    }

    #[test]
    fn no_bonus_flags_score_zero() {
        let tables = ScoringTables::standard();
        let points = additional_points(
            &profile(BonusFactors::default()),
            &french_first(8, Some(9)),
            &tables,
        );
        assert_eq!(points, AdditionalPoints::default());
    }

    #[test]
    fn flat_bonuses_add_up() {
        let tables = ScoringTables::standard();
        let points = additional_points(
            &profile(BonusFactors {
                provincial_nomination: true,
                arranged_employment: ArrangedEmployment::Other,
                canadian_study: CanadianStudy::ThreeOrMoreYears,
                sibling_in_canada: true,
                french_bonus_eligible: false,
            }),
            &french_first(8, None),
            &tables,
        );

        assert_eq!(points.provincial_nomination, 600);
        assert_eq!(points.arranged_employment, 50);
        assert_eq!(points.canadian_study, 30);
        assert_eq!(points.sibling_in_canada, 15);
        assert_eq!(points.french_language, 0);
        assert_eq!(points.total, 695);
    }

    #[test]
    fn french_bonus_higher_tier_needs_functional_english() {
        let tables = ScoringTables::standard();
        let bonus = BonusFactors {
            french_bonus_eligible: true,
            ..BonusFactors::default()
        };

        let with_english = additional_points(&profile(bonus), &french_first(7, Some(5)), &tables);
        assert_eq!(with_english.french_language, 50);

        let weak_english = additional_points(&profile(bonus), &french_first(7, Some(4)), &tables);
        assert_eq!(weak_english.french_language, 25);

        let no_english = additional_points(&profile(bonus), &french_first(7, None), &tables);
        assert_eq!(no_english.french_language, 25);
    }

    #[test]
    fn french_bonus_requires_strong_french() {
        let tables = ScoringTables::standard();
        let bonus = BonusFactors {
            french_bonus_eligible: true,
            ..BonusFactors::default()
        };

        let mut languages = french_first(9, Some(9));
        languages.first.levels.speaking = 6;
        let points = additional_points(&profile(bonus), &languages, &tables);
        assert_eq!(points.french_language, 0);
    }

    #[test]
    fn french_may_be_the_second_language() {
        let tables = ScoringTables::standard();
        let bonus = BonusFactors {
            french_bonus_eligible: true,
            ..BonusFactors::default()
        };
        let languages = NormalizedLanguages {
            first: NormalizedTest {
                test: TestType::CelpipGeneral,
                levels: ProficiencyLevels::uniform(9),
            },
            second: Some(NormalizedTest {
                test: TestType::TcfCanada,
                levels: ProficiencyLevels::uniform(7),
            }),
            spouse: None,
        };

        let points = additional_points(&profile(bonus), &languages, &tables);
        assert_eq!(points.french_language, 50);
    }
}
