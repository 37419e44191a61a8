//! Point calculators, one per breakdown category. Each reads only the validated profile,
//! its normalized language results and the table set.

mod additional;
mod human_capital;
mod spouse;
mod transferability;

pub(crate) use additional::additional_points;
pub(crate) use human_capital::core_human_capital;
pub(crate) use spouse::spouse_factors;
pub(crate) use transferability::skill_transferability;
