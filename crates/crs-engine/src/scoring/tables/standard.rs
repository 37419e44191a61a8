use super::{
    AdditionalTables, CombinationCaps, CombinationTable, EducationPoints, FactorTables,
    PointBands, ProfileLimits, ScoringTables, SpouseTables, TransferabilityTables,
};
use crate::scoring::domain::EducationLevel;
use crate::scoring::proficiency::ConversionTables;

pub const STANDARD_VERSION: &str = "crs-standard-2024";

impl ScoringTables {
    /// Published point grid for the ranking system.
    pub fn standard() -> Self {
        Self {
            version: STANDARD_VERSION.to_string(),
            system_maximum: 1200,
            unassessed_foreign_ceiling: EducationLevel::Secondary,
            limits: ProfileLimits {
                min_age: 16,
                max_age: 100,
                max_canadian_years: 5,
                max_foreign_years: 10,
            },
            with_spouse: with_spouse(),
            without_spouse: without_spouse(),
            spouse: spouse(),
            transferability: transferability(),
            additional: AdditionalTables {
                provincial_nomination: 600,
                arranged_employment_senior: 200,
                arranged_employment_other: 50,
                canadian_study_short: 15,
                canadian_study_long: 30,
                sibling_in_canada: 15,
                french_with_english: 50,
                french_only: 25,
                french_threshold: 7,
                english_threshold: 5,
            },
            conversion: ConversionTables::standard(),
        }
    }
}

fn with_spouse() -> FactorTables {
    FactorTables {
        age: PointBands::new(
            0,
            &[
                (18, 90),
                (19, 95),
                (20, 100),
                (30, 95),
                (31, 90),
                (32, 85),
                (33, 80),
                (34, 75),
                (35, 70),
                (36, 65),
                (37, 60),
                (38, 55),
                (39, 50),
                (40, 45),
                (41, 35),
                (42, 25),
                (43, 15),
                (44, 5),
                (45, 0),
            ],
        ),
        education: EducationPoints {
            less_than_secondary: 0,
            secondary: 28,
            one_year_post_secondary: 84,
            two_year_post_secondary: 91,
            bachelors: 112,
            two_or_more_credentials: 119,
            masters: 126,
            doctoral: 140,
        },
        first_language: PointBands::new(
            0,
            &[(4, 24), (6, 32), (7, 64), (8, 88), (9, 116), (10, 128)],
        ),
        second_language: PointBands::new(0, &[(5, 4), (7, 12), (9, 22)]),
        canadian_work: PointBands::new(0, &[(1, 35), (2, 46), (3, 56), (4, 63), (5, 70)]),
    }
}

fn without_spouse() -> FactorTables {
    FactorTables {
        age: PointBands::new(
            0,
            &[
                (18, 99),
                (19, 105),
                (20, 110),
                (30, 105),
                (31, 99),
                (32, 94),
                (33, 88),
                (34, 83),
                (35, 77),
                (36, 72),
                (37, 66),
                (38, 61),
                (39, 55),
                (40, 50),
                (41, 39),
                (42, 28),
                (43, 17),
                (44, 6),
                (45, 0),
            ],
        ),
        education: EducationPoints {
            less_than_secondary: 0,
            secondary: 30,
            one_year_post_secondary: 90,
            two_year_post_secondary: 98,
            bachelors: 120,
            two_or_more_credentials: 128,
            masters: 135,
            doctoral: 150,
        },
        first_language: PointBands::new(
            0,
            &[(4, 24), (6, 36), (7, 68), (8, 92), (9, 124), (10, 136)],
        ),
        second_language: PointBands::new(0, &[(5, 4), (7, 12), (9, 24)]),
        canadian_work: PointBands::new(0, &[(1, 40), (2, 53), (3, 64), (4, 72), (5, 80)]),
    }
}

fn spouse() -> SpouseTables {
    SpouseTables {
        education: EducationPoints {
            less_than_secondary: 0,
            secondary: 2,
            one_year_post_secondary: 6,
            two_year_post_secondary: 7,
            bachelors: 8,
            two_or_more_credentials: 9,
            masters: 10,
            doctoral: 10,
        },
        language: PointBands::new(0, &[(5, 4), (7, 12), (9, 20)]),
        canadian_work: PointBands::new(0, &[(1, 5), (2, 7), (3, 8), (4, 9), (5, 10)]),
    }
}

fn transferability() -> TransferabilityTables {
    let one_year = EducationLevel::OneYearPostSecondary.rank();
    let two_or_more = EducationLevel::TwoOrMoreCredentials.rank();

    TransferabilityTables {
        education_language: CombinationTable::new(
            &[7, 9],
            &[(one_year, [13, 25]), (two_or_more, [25, 50])],
        ),
        education_canadian_work: CombinationTable::new(
            &[1, 2],
            &[(one_year, [13, 25]), (two_or_more, [25, 50])],
        ),
        foreign_work_language: CombinationTable::new(&[7, 9], &[(1, [13, 25]), (3, [25, 50])]),
        foreign_work_canadian_work: CombinationTable::new(
            &[1, 2],
            &[(1, [13, 25]), (3, [25, 50])],
        ),
        certificate_language: CombinationTable::new(&[5, 7], &[(1, [25, 50])]),
        combination_caps: CombinationCaps::uniform(50),
        group_cap: 50,
        category_cap: 100,
    }
}
