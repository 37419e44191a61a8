use serde::{Deserialize, Serialize};

use super::tables::Points;

/// Age, education, official languages and Canadian work experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreHumanCapital {
    pub age: Points,
    pub education: Points,
    pub first_language: Points,
    pub second_language: Points,
    pub canadian_work: Points,
    pub total: Points,
}

impl CoreHumanCapital {
    pub fn new(
        age: Points,
        education: Points,
        first_language: Points,
        second_language: Points,
        canadian_work: Points,
    ) -> Self {
        Self {
            age,
            education,
            first_language,
            second_language,
            canadian_work,
            total: age + education + first_language + second_language + canadian_work,
        }
    }
}

/// Accompanying spouse factors; all zero for candidates without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpouseFactors {
    pub education: Points,
    pub language: Points,
    pub canadian_work: Points,
    pub total: Points,
}

impl SpouseFactors {
    pub fn new(education: Points, language: Points, canadian_work: Points) -> Self {
        Self {
            education,
            language,
            canadian_work,
            total: education + language + canadian_work,
        }
    }
}

/// Combination points. Components are already clamped to the per-combination cap and
/// `total` is the capped category total, so it can be lower than the component sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTransferability {
    pub education_language: Points,
    pub education_canadian_work: Points,
    pub foreign_work_language: Points,
    pub foreign_work_canadian_work: Points,
    pub certificate_language: Points,
    pub total: Points,
}

impl SkillTransferability {
    pub fn component_sum(&self) -> Points {
        self.education_language
            + self.education_canadian_work
            + self.foreign_work_language
            + self.foreign_work_canadian_work
            + self.certificate_language
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalPoints {
    pub provincial_nomination: Points,
    pub arranged_employment: Points,
    pub canadian_study: Points,
    pub sibling_in_canada: Points,
    pub french_language: Points,
    pub total: Points,
}

impl AdditionalPoints {
    pub fn new(
        provincial_nomination: Points,
        arranged_employment: Points,
        canadian_study: Points,
        sibling_in_canada: Points,
        french_language: Points,
    ) -> Self {
        Self {
            provincial_nomination,
            arranged_employment,
            canadian_study,
            sibling_in_canada,
            french_language,
            total: provincial_nomination
                + arranged_employment
                + canadian_study
                + sibling_in_canada
                + french_language,
        }
    }
}

/// Full score breakdown, stamped with the table version it was computed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub core: CoreHumanCapital,
    pub spouse: SpouseFactors,
    pub skill_transferability: SkillTransferability,
    pub additional: AdditionalPoints,
    pub grand_total: Points,
    pub table_version: String,
}

impl Breakdown {
    /// Merge the four category subtotals and clamp the sum to `system_maximum`.
    pub fn assemble(
        core: CoreHumanCapital,
        spouse: SpouseFactors,
        skill_transferability: SkillTransferability,
        additional: AdditionalPoints,
        system_maximum: Points,
        table_version: impl Into<String>,
    ) -> Self {
        let subtotal_sum =
            core.total + spouse.total + skill_transferability.total + additional.total;

        Self {
            core,
            spouse,
            skill_transferability,
            additional,
            grand_total: subtotal_sum.min(system_maximum),
            table_version: table_version.into(),
        }
    }

    /// Unclamped sum of the four category totals.
    pub fn subtotal_sum(&self) -> Points {
        self.core.total
            + self.spouse.total
            + self.skill_transferability.total
            + self.additional.total
    }

    pub fn was_clamped(&self) -> bool {
        self.subtotal_sum() > self.grand_total
    }
}
