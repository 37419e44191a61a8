use super::domain::Profile;
use super::error::{CrsError, FieldViolation};
use super::tables::ProfileLimits;

/// Structural checks that run before any table lookup. Every violation is collected so
/// callers can surface all form errors at once.
///
/// A missing spouse profile on its own is reported as `MissingSpouseProfile`; when other
/// fields are also invalid it is listed with them under `InvalidProfile`.
pub fn validate_profile(profile: &Profile, limits: &ProfileLimits) -> Result<(), CrsError> {
    let mut violations = Vec::new();

    if !(limits.min_age..=limits.max_age).contains(&profile.age) {
        violations.push(FieldViolation::new(
            "age",
            format!("must be between {} and {}", limits.min_age, limits.max_age),
        ));
    }

    if profile.work.canadian_years > limits.max_canadian_years {
        violations.push(FieldViolation::new(
            "work.canadianYears",
            format!("must not exceed {}", limits.max_canadian_years),
        ));
    }

    if profile.work.foreign_years > limits.max_foreign_years {
        violations.push(FieldViolation::new(
            "work.foreignYears",
            format!("must not exceed {}", limits.max_foreign_years),
        ));
    }

    if let Some(second) = &profile.second_language {
        if second.test.language() == profile.first_language.test.language() {
            violations.push(FieldViolation::new(
                "secondLanguage.test",
                "must assess the other official language",
            ));
        }
    }

    if profile.has_accompanying_spouse && !profile.marital_status.has_partner() {
        violations.push(FieldViolation::new(
            "maritalStatus",
            format!(
                "{} cannot declare an accompanying spouse",
                profile.marital_status.label()
            ),
        ));
    }

    let mut spouse_missing = false;
    match (&profile.spouse, profile.has_accompanying_spouse) {
        (Some(spouse), true) => {
            if !(limits.min_age..=limits.max_age).contains(&spouse.age) {
                violations.push(FieldViolation::new(
                    "spouse.age",
                    format!("must be between {} and {}", limits.min_age, limits.max_age),
                ));
            }
            if spouse.canadian_years > limits.max_canadian_years {
                violations.push(FieldViolation::new(
                    "spouse.canadianYears",
                    format!("must not exceed {}", limits.max_canadian_years),
                ));
            }
        }
        (Some(_), false) => violations.push(FieldViolation::new(
            "spouse",
            "must be omitted when no spouse accompanies the candidate",
        )),
        (None, true) => spouse_missing = true,
        (None, false) => {}
    }

    if violations.is_empty() {
        return if spouse_missing {
            Err(CrsError::MissingSpouseProfile)
        } else {
            Ok(())
        };
    }

    if spouse_missing {
        violations.push(FieldViolation::new(
            "spouse",
            "is required when an accompanying spouse is declared",
        ));
    }

    Err(CrsError::InvalidProfile { violations })
}
