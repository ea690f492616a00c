//! Obsidian vault (markdown notes directory) importer.
//!
//! # Responsibility
//! - Walk a vault tree and produce one canonical record per markdown note.
//! - Derive each note's event timestamp from its filename when possible,
//!   falling back to filesystem modification time.
//!
//! # Invariants
//! - The `.obsidian` tooling directory is never treated as content, at any
//!   depth; dotfiles are always skipped.
//! - Records come back in traversal order; no cross-file timestamp sort.
//! - An unreadable or non-UTF-8 note fails the whole import call.

use crate::import::ImportError;
use crate::model::record::{MemoryRecord, META_ORIGINAL_PATH};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// `source` literal stamped on every record produced here.
pub const OBSIDIAN_SOURCE: &str = "obsidian";

/// Only files with this extension are considered notes.
const NOTE_EXTENSION: &str = "md";

/// Vault-internal tooling directory, excluded regardless of depth.
const RESERVED_DIR_NAME: &str = ".obsidian";

// Leading ISO-8601 date-time: date, `T`, time, optional fractional seconds,
// optional `Z` or numeric offset. Date/time punctuation is optional.
static ISO_DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})-?(\d{2})-?(\d{2})T(\d{2}):?(\d{2})(?::?(\d{2}))?(?:\.(\d{1,9}))?(Z|[+-]\d{2}:?\d{2})?",
    )
    .expect("valid iso datetime regex")
});

// Leading bare calendar date.
static DATE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("valid date prefix regex"));

type NameStrategy = fn(&str) -> Option<DateTime<FixedOffset>>;

/// Filename-based extraction strategies, tried in order; the file's
/// modification time is the final fallback (see `derive_timestamp`).
const NAME_STRATEGIES: &[NameStrategy] = &[iso_prefix_timestamp, date_prefix_timestamp];

/// Imports every markdown note under `root` into canonical records.
///
/// Returns one record per matching file in traversal order. A vault with
/// no matching files yields an empty `Ok` result.
pub fn import_obsidian_vault(root: &Path) -> Result<Vec<MemoryRecord>, ImportError> {
    let started_at = Instant::now();
    info!(
        "event=obsidian_import module=import status=start vault={}",
        root.display()
    );

    let mut records = Vec::new();
    let result = collect_notes(root, root, &mut records).map(|()| records);
    match &result {
        Ok(records) => info!(
            "event=obsidian_import module=import status=ok notes={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=obsidian_import module=import status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn collect_notes(
    root: &Path,
    dir: &Path,
    records: &mut Vec<MemoryRecord>,
) -> Result<(), ImportError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    // read_dir order is platform-dependent; sort for a stable traversal.
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name == RESERVED_DIR_NAME || name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            collect_notes(root, &path, records)?;
            continue;
        }

        if path.extension().and_then(|ext| ext.to_str()) != Some(NOTE_EXTENSION) {
            continue;
        }

        records.push(note_record(root, &path)?);
    }

    Ok(())
}

fn note_record(root: &Path, path: &Path) -> Result<MemoryRecord, ImportError> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let memory_created_at = derive_timestamp(stem, path)?;

    // Non-UTF-8 content surfaces as an io error here and fails the call.
    let content = fs::read_to_string(path)?;

    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut record = MemoryRecord::new(OBSIDIAN_SOURCE, stem, memory_created_at);
    record
        .metadata
        .insert(META_ORIGINAL_PATH.to_string(), slash_path(relative));
    record.content = Some(content);
    Ok(record)
}

/// Derives the note timestamp: filename strategies first, mtime fallback.
fn derive_timestamp(stem: &str, path: &Path) -> Result<DateTime<FixedOffset>, ImportError> {
    for strategy in NAME_STRATEGIES {
        if let Some(at) = strategy(stem) {
            return Ok(at);
        }
    }
    modified_timestamp(path)
}

/// Full ISO-8601 date-time prefix; explicit zone preserved, local assumed.
fn iso_prefix_timestamp(stem: &str) -> Option<DateTime<FixedOffset>> {
    let caps = ISO_DATETIME_RE.captures(stem)?;

    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps.get(6).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let nanos = caps.get(7).map_or(Some(0), |m| frac_nanos(m.as_str()))?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    let naive = NaiveDateTime::new(date, time);

    match caps.get(8).map(|m| m.as_str()) {
        Some("Z") => Some(Utc.from_utc_datetime(&naive).fixed_offset()),
        Some(numeric) => {
            let offset = numeric_offset(numeric)?;
            offset.from_local_datetime(&naive).single()
        }
        None => local_instant(naive),
    }
}

/// Bare `YYYY-MM-DD` prefix, read as local midnight.
fn date_prefix_timestamp(stem: &str) -> Option<DateTime<FixedOffset>> {
    let caps = DATE_PREFIX_RE.captures(stem)?;

    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    local_instant(naive)
}

fn modified_timestamp(path: &Path) -> Result<DateTime<FixedOffset>, ImportError> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).fixed_offset())
}

fn local_instant(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    // `earliest` picks the pre-transition instant for DST-ambiguous times.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.fixed_offset())
}

/// Parses `±HH:MM` / `±HHMM` into a fixed offset.
fn numeric_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 60 + minutes) * 60)
}

/// Pads or truncates a fractional-second capture to nanoseconds.
fn frac_nanos(digits: &str) -> Option<u32> {
    let truncated = &digits[..digits.len().min(9)];
    let value: u32 = truncated.parse().ok()?;
    Some(value * 10u32.pow(9 - truncated.len() as u32))
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
