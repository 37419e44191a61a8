use crate::scoring::breakdown::SkillTransferability;
use crate::scoring::domain::{NormalizedLanguages, Profile};
use crate::scoring::tables::ScoringTables;

/// Combination points across education, language and work experience.
///
/// Each combination is clamped to its own entry in `combination_caps`, the education pair
/// and the foreign work pair are each clamped to `group_cap`, and the category to
/// `category_cap`. The caps clamp computed values; table entries are never rewritten.
pub(crate) fn skill_transferability(
    profile: &Profile,
    languages: &NormalizedLanguages,
    tables: &ScoringTables,
) -> SkillTransferability {
    let grid = &tables.transferability;
    let caps = &grid.combination_caps;

    let education_rank = profile
        .education
        .scored_level(tables.unassessed_foreign_ceiling)
        .rank();
    let language = languages.first.levels.minimum();
    let canadian_years = profile.work.canadian_years;
    let foreign_years = profile.work.foreign_years;
    let certificate = u8::from(profile.trade_certificate);

    let education_language = grid
        .education_language
        .lookup(education_rank, language)
        .min(caps.education_language);
    let education_canadian_work = grid
        .education_canadian_work
        .lookup(education_rank, canadian_years)
        .min(caps.education_canadian_work);
    let foreign_work_language = grid
        .foreign_work_language
        .lookup(foreign_years, language)
        .min(caps.foreign_work_language);
    let foreign_work_canadian_work = grid
        .foreign_work_canadian_work
        .lookup(foreign_years, canadian_years)
        .min(caps.foreign_work_canadian_work);
    let certificate_language = grid
        .certificate_language
        .lookup(certificate, language)
        .min(caps.certificate_language);

    let education_group = (education_language + education_canadian_work).min(grid.group_cap);
    let foreign_group = (foreign_work_language + foreign_work_canadian_work).min(grid.group_cap);
    let certificate_group = certificate_language.min(grid.group_cap);

    SkillTransferability {
        education_language,
        education_canadian_work,
        foreign_work_language,
        foreign_work_canadian_work,
        certificate_language,
        total: (education_group + foreign_group + certificate_group).min(grid.category_cap),
    }
}
