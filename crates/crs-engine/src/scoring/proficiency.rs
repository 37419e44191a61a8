//! Conversion of raw language test scores into benchmark levels.
//!
//! Every test owns a band table per skill. A raw score maps to the highest band whose
//! lower bound it meets; scores outside the documented domain of the test are rejected
//! rather than clamped.

use serde::{Deserialize, Serialize};

use super::domain::{LanguageTestResult, ProficiencyLevels, RawScores, Skill, TestType};
use super::error::CrsError;
use super::tables::TableError;

/// Highest benchmark level the scoring tables distinguish.
pub const MAX_LEVEL: u8 = 10;

const STEP_TOLERANCE: f64 = 1e-9;

/// Band table for one skill of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBands {
    /// Highest score the test reports for the skill.
    pub max: f64,
    /// Reporting increment (IELTS reports half bands).
    #[serde(default)]
    pub step: Option<f64>,
    /// Ascending `(lower bound, level)` pairs.
    pub bands: Vec<(f64, u8)>,
}

impl SkillBands {
    pub fn new(max: f64, step: Option<f64>, bands: &[(f64, u8)]) -> Self {
        Self {
            max,
            step,
            bands: bands.to_vec(),
        }
    }

    /// Level for `score`, or `None` when the score is outside the test's domain.
    pub fn level_for(&self, score: f64) -> Option<u8> {
        if !score.is_finite() || score > self.max {
            return None;
        }

        if let Some(step) = self.step {
            let steps = score / step;
            if (steps - steps.round()).abs() > STEP_TOLERANCE {
                return None;
            }
        }

        self.bands
            .iter()
            .rev()
            .find(|(lower, _)| score >= *lower)
            .map(|(_, level)| *level)
    }

    pub(crate) fn validate(&self, path: &str) -> Result<(), TableError> {
        let invalid = |reason: &str| TableError::InvalidBands {
            table: path.to_string(),
            reason: reason.to_string(),
        };

        let Some((lowest, _)) = self.bands.first() else {
            return Err(invalid("no bands defined"));
        };
        if !self.max.is_finite() || self.max < *lowest {
            return Err(invalid("maximum score is below the lowest band"));
        }
        if let Some(step) = self.step {
            if !(step.is_finite() && step > 0.0) {
                return Err(invalid("step must be positive"));
            }
        }

        for pair in self.bands.windows(2) {
            let (lower_a, level_a) = pair[0];
            let (lower_b, level_b) = pair[1];
            if lower_b <= lower_a {
                return Err(invalid("lower bounds must be strictly ascending"));
            }
            if level_b < level_a {
                return Err(invalid("levels must not decrease as scores increase"));
            }
        }

        if self.bands.iter().any(|(_, level)| *level > MAX_LEVEL) {
            return Err(invalid("levels must be between 0 and 10"));
        }

        Ok(())
    }
}

/// Per-skill band tables of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestBands {
    pub reading: SkillBands,
    pub listening: SkillBands,
    pub speaking: SkillBands,
    pub writing: SkillBands,
}

impl TestBands {
    pub fn for_skill(&self, skill: Skill) -> &SkillBands {
        match skill {
            Skill::Reading => &self.reading,
            Skill::Listening => &self.listening,
            Skill::Speaking => &self.speaking,
            Skill::Writing => &self.writing,
        }
    }

    fn uniform(bands: SkillBands) -> Self {
        Self {
            reading: bands.clone(),
            listening: bands.clone(),
            speaking: bands.clone(),
            writing: bands,
        }
    }
}

/// Conversion tables for every accepted test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionTables {
    pub ielts_general: TestBands,
    pub celpip_general: TestBands,
    pub tef_canada: TestBands,
    pub tcf_canada: TestBands,
}

impl ConversionTables {
    pub fn for_test(&self, test: TestType) -> &TestBands {
        match test {
            TestType::IeltsGeneral => &self.ielts_general,
            TestType::CelpipGeneral => &self.celpip_general,
            TestType::TefCanada => &self.tef_canada,
            TestType::TcfCanada => &self.tcf_canada,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TableError> {
        for test in TestType::ALL {
            let bands = self.for_test(test);
            for skill in Skill::ALL {
                bands
                    .for_skill(skill)
                    .validate(&format!("conversion.{:?}.{}", test, skill.label()))?;
            }
        }
        Ok(())
    }

    /// Published conversion charts for the four accepted tests.
    pub fn standard() -> Self {
        Self {
            ielts_general: TestBands {
                reading: SkillBands::new(
                    9.0,
                    Some(0.5),
                    &[(3.5, 4), (4.0, 5), (5.0, 6), (6.0, 7), (6.5, 8), (7.0, 9), (8.0, 10)],
                ),
                listening: SkillBands::new(
                    9.0,
                    Some(0.5),
                    &[(4.5, 4), (5.0, 5), (5.5, 6), (6.0, 7), (7.5, 8), (8.0, 9), (8.5, 10)],
                ),
                speaking: SkillBands::new(
                    9.0,
                    Some(0.5),
                    &[(4.0, 4), (5.0, 5), (5.5, 6), (6.0, 7), (6.5, 8), (7.0, 9), (7.5, 10)],
                ),
                writing: SkillBands::new(
                    9.0,
                    Some(0.5),
                    &[(4.0, 4), (5.0, 5), (5.5, 6), (6.0, 7), (6.5, 8), (7.0, 9), (7.5, 10)],
                ),
            },
            celpip_general: TestBands::uniform(SkillBands::new(
                12.0,
                Some(1.0),
                &[(4.0, 4), (5.0, 5), (6.0, 6), (7.0, 7), (8.0, 8), (9.0, 9), (10.0, 10)],
            )),
            tef_canada: TestBands {
                reading: SkillBands::new(
                    300.0,
                    Some(1.0),
                    &[
                        (121.0, 4),
                        (151.0, 5),
                        (181.0, 6),
                        (207.0, 7),
                        (233.0, 8),
                        (248.0, 9),
                        (263.0, 10),
                    ],
                ),
                listening: SkillBands::new(
                    360.0,
                    Some(1.0),
                    &[
                        (145.0, 4),
                        (181.0, 5),
                        (217.0, 6),
                        (249.0, 7),
                        (280.0, 8),
                        (298.0, 9),
                        (316.0, 10),
                    ],
                ),
                speaking: tef_productive_bands(),
                writing: tef_productive_bands(),
            },
            tcf_canada: TestBands {
                reading: SkillBands::new(
                    699.0,
                    Some(1.0),
                    &[
                        (342.0, 4),
                        (375.0, 5),
                        (406.0, 6),
                        (453.0, 7),
                        (499.0, 8),
                        (524.0, 9),
                        (549.0, 10),
                    ],
                ),
                listening: SkillBands::new(
                    699.0,
                    Some(1.0),
                    &[
                        (331.0, 4),
                        (369.0, 5),
                        (398.0, 6),
                        (458.0, 7),
                        (503.0, 8),
                        (523.0, 9),
                        (549.0, 10),
                    ],
                ),
                speaking: tcf_productive_bands(),
                writing: tcf_productive_bands(),
            },
        }
    }
}

fn tef_productive_bands() -> SkillBands {
    SkillBands::new(
        450.0,
        Some(1.0),
        &[
            (181.0, 4),
            (226.0, 5),
            (271.0, 6),
            (310.0, 7),
            (349.0, 8),
            (371.0, 9),
            (393.0, 10),
        ],
    )
}

fn tcf_productive_bands() -> SkillBands {
    SkillBands::new(
        20.0,
        Some(1.0),
        &[(4.0, 4), (6.0, 5), (7.0, 6), (10.0, 7), (12.0, 8), (14.0, 9), (16.0, 10)],
    )
}

/// Convert the four raw scores of `test` into benchmark levels.
pub fn normalize_proficiency(
    tables: &ConversionTables,
    test: TestType,
    scores: &RawScores,
) -> Result<ProficiencyLevels, CrsError> {
    let bands = tables.for_test(test);
    let level = |skill: Skill| {
        let score = scores.get(skill);
        bands
            .for_skill(skill)
            .level_for(score)
            .ok_or(CrsError::InvalidTestScore { test, skill, score })
    };

    Ok(ProficiencyLevels {
        reading: level(Skill::Reading)?,
        listening: level(Skill::Listening)?,
        speaking: level(Skill::Speaking)?,
        writing: level(Skill::Writing)?,
    })
}

pub(crate) fn normalize_result(
    tables: &ConversionTables,
    result: &LanguageTestResult,
) -> Result<ProficiencyLevels, CrsError> {
    normalize_proficiency(tables, result.test, &result.scores)
}
