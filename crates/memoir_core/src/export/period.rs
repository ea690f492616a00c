//! Period grouping and day-block serialization.
//!
//! # Responsibility
//! - Group records day-first, then into one output file per period.
//! - Write `<fileKey>.txt` files, overwriting previous exports.
//!
//! # Invariants
//! - Day keys are derived in each record's carried offset.
//! - Days inside a file are sorted ascending; the fixed-width key makes
//!   lexical order chronological.

use crate::export::ExportError;
use crate::model::record::{MemoryRecord, StoredMemoryRecord};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

/// Calendar period selector for export file grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPeriod {
    /// One file per calendar month, e.g. `March2025.txt`.
    Month,
    /// One file per calendar year, e.g. `2025.txt`.
    Year,
}

impl FromStr for ExportPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("unsupported period `{other}`; expected month|year")),
        }
    }
}

/// Writes one text file per period into `dest`.
///
/// `records` is expected in ascending `memory_created_at` order, as
/// returned by the repository. An empty input writes no files.
pub fn export_periods(
    records: &[StoredMemoryRecord],
    dest: &Path,
    period: ExportPeriod,
) -> Result<(), ExportError> {
    let started_at = Instant::now();
    if records.is_empty() {
        info!("event=period_export module=export status=ok files=0 records=0");
        return Ok(());
    }

    // file-key -> day-key -> records; both levels sort via BTreeMap keys.
    let mut files: BTreeMap<String, BTreeMap<String, Vec<&StoredMemoryRecord>>> = BTreeMap::new();
    for stored in records {
        let at = stored.record.memory_created_at;
        files
            .entry(file_key(&stored.record, period))
            .or_default()
            .entry(at.format("%Y-%m-%d").to_string())
            .or_default()
            .push(stored);
    }

    let file_count = files.len();
    for (key, days) in &files {
        let blocks: Vec<String> = days
            .iter()
            .map(|(day, day_records)| day_block(day, day_records))
            .collect();
        let mut body = blocks.join("\n\n");
        body.push('\n');
        fs::write(dest.join(format!("{key}.txt")), body)?;
    }

    info!(
        "event=period_export module=export status=ok files={} records={} duration_ms={}",
        file_count,
        records.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

/// File grouping key: `2025` for years, `March2025` for months.
fn file_key(record: &MemoryRecord, period: ExportPeriod) -> String {
    match period {
        ExportPeriod::Year => record.memory_created_at.format("%Y").to_string(),
        ExportPeriod::Month => record.memory_created_at.format("%B%Y").to_string(),
    }
}

/// One day's serialized block: date markers wrapping the day's records,
/// records separated by a horizontal rule. `id` and `source` are excluded.
fn day_block(day: &str, records: &[&StoredMemoryRecord]) -> String {
    let mut parts = Vec::with_capacity(records.len());
    for stored in records {
        let mut part = format!(
            "## {}\nTime: {}",
            stored.record.title,
            stored.record.memory_created_at.format("%H:%M")
        );
        if let Some(content) = &stored.record.content {
            part.push('\n');
            part.push_str(content);
        }
        parts.push(part);
    }

    format!("<{day}>\n{}\n</{day}>", parts.join("\n\n---\n\n"))
}

#[cfg(test)]
mod tests {
    use super::{file_key, ExportPeriod};
    use crate::model::record::MemoryRecord;
    use chrono::{DateTime, FixedOffset};
    use std::str::FromStr;

    fn record_at(rfc3339: &str) -> MemoryRecord {
        let at = DateTime::<FixedOffset>::parse_from_rfc3339(rfc3339).unwrap();
        MemoryRecord::new("daylio", "Daylio: test", at)
    }

    #[test]
    fn month_file_key_is_month_name_and_year() {
        let record = record_at("2025-03-15T10:00:00+01:00");
        assert_eq!(file_key(&record, ExportPeriod::Month), "March2025");
    }

    #[test]
    fn year_file_key_is_four_digit_year() {
        let record = record_at("2025-03-15T10:00:00+01:00");
        assert_eq!(file_key(&record, ExportPeriod::Year), "2025");
    }

    #[test]
    fn file_key_uses_the_carried_offset() {
        // 00:30 on April 1st in +02:00 is still March in UTC; the carried
        // offset decides the month.
        let record = record_at("2025-04-01T00:30:00+02:00");
        assert_eq!(file_key(&record, ExportPeriod::Month), "April2025");
    }

    #[test]
    fn period_parses_from_selector_strings() {
        assert_eq!(ExportPeriod::from_str("month"), Ok(ExportPeriod::Month));
        assert_eq!(ExportPeriod::from_str(" Year "), Ok(ExportPeriod::Year));
        assert!(ExportPeriod::from_str("week").is_err());
    }
}
