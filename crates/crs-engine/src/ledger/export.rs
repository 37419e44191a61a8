use std::io::Write;

use serde::Serialize;

use super::HistoryEntry;
use crate::scoring::Points;

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    calculated_at: String,
    score: Points,
    core: Points,
    spouse: Points,
    skill_transferability: Points,
    additional: Points,
    table_version: &'a str,
}

impl<'a> From<&'a HistoryEntry> for HistoryRow<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            calculated_at: entry.calculated_at.to_rfc3339(),
            score: entry.score,
            core: entry.breakdown.core.total,
            spouse: entry.breakdown.spouse.total,
            skill_transferability: entry.breakdown.skill_transferability.total,
            additional: entry.breakdown.additional.total,
            table_version: &entry.breakdown.table_version,
        }
    }
}

/// Write one CSV row per history entry, oldest first, with a header row.
pub fn export_history_csv<W: Write>(entries: &[HistoryEntry], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(HistoryRow::from(entry))?;
    }
    csv_writer.flush()?;
    Ok(())
}
