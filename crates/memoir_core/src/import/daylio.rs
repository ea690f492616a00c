//! Daylio backup archive importer.
//!
//! # Responsibility
//! - Decode the `.daylio` ZIP archive (one base64-encoded JSON entry).
//! - Collapse per-entry mood data into one canonical record per calendar day.
//! - Resolve mood and tag references through the backup's own tables.
//!
//! # Invariants
//! - A malformed archive/payload fails the whole import; an unresolvable
//!   mood or tag reference never does.
//! - The returned list is ordered ascending by instant, not by day-key text.
//! - Zone offsets are truncated to whole hours (`round(ms/60000)/60`), the
//!   same lossy mapping the backup format has always been read with.

use crate::import::ImportError;
use crate::model::record::{MemoryRecord, META_DAY_KEY, META_ENTRY_COUNT};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::{FixedOffset, TimeZone, Utc};
use log::{error, info};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// `source` literal stamped on every record produced here.
pub const DAYLIO_SOURCE: &str = "daylio";

/// Title prefix; full title is `"Daylio: <dayKey>"`.
const TITLE_LABEL: &str = "Daylio";

/// The single reserved payload entry inside the ZIP archive.
const BACKUP_ENTRY_NAME: &str = "backup.daylio";

/// Placeholder for mood references that cannot be resolved.
const UNKNOWN_MOOD_NAME: &str = "Unknown";

/// Predefined mood names by group id 1..=5, best to worst.
const PREDEFINED_MOOD_NAMES: [&str; 5] = ["Rad", "Good", "Meh", "Bad", "Awful"];

#[derive(Debug, Deserialize)]
struct DaylioBackup {
    #[serde(rename = "customMoods", default)]
    custom_moods: Vec<DaylioMood>,
    #[serde(default)]
    tags: Vec<DaylioTag>,
    // Required: a backup without the entry list is not a backup.
    #[serde(rename = "dayEntries")]
    day_entries: Vec<DayEntry>,
}

#[derive(Debug, Deserialize)]
struct DaylioMood {
    id: i64,
    #[serde(default)]
    custom_name: String,
    #[serde(default)]
    mood_group_id: i64,
}

#[derive(Debug, Deserialize)]
struct DaylioTag {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DayEntry {
    mood: i64,
    #[serde(default)]
    tags: Vec<i64>,
    #[serde(default)]
    note: String,
    year: i32,
    /// 0-indexed in the backup format.
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    /// Epoch milliseconds of the entry instant.
    datetime: i64,
    /// UTC offset in milliseconds at entry time.
    #[serde(rename = "timeZoneOffset", default)]
    timezone_offset_ms: i64,
}

/// Imports a Daylio backup archive into canonical day records.
///
/// Returns one record per calendar day present in the backup, fully
/// materialized and sorted ascending by `memory_created_at`. An empty
/// `dayEntries` list yields an empty `Ok` result.
pub fn import_daylio_archive(path: &Path) -> Result<Vec<MemoryRecord>, ImportError> {
    let started_at = Instant::now();
    info!(
        "event=daylio_import module=import status=start archive={}",
        path.display()
    );

    let result = build_records(path);
    match &result {
        Ok(records) => info!(
            "event=daylio_import module=import status=ok days={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=daylio_import module=import status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn build_records(path: &Path) -> Result<Vec<MemoryRecord>, ImportError> {
    let backup = read_backup(path)?;

    let moods: HashMap<i64, &DaylioMood> = backup
        .custom_moods
        .iter()
        .map(|mood| (mood.id, mood))
        .collect();
    let tag_names: HashMap<i64, &str> = backup
        .tags
        .iter()
        .map(|tag| (tag.id, tag.name.as_str()))
        .collect();

    let mut day_groups: BTreeMap<String, Vec<&DayEntry>> = BTreeMap::new();
    for entry in &backup.day_entries {
        day_groups
            .entry(day_key(entry.year, entry.month, entry.day))
            .or_default()
            .push(entry);
    }

    let mut records = Vec::with_capacity(day_groups.len());
    for (day, mut entries) in day_groups {
        // Unreachable given the grouping above; kept as a guard.
        if entries.is_empty() {
            continue;
        }

        // Stable, so entries at the same minute keep backup order.
        entries.sort_by_key(|entry| entry.hour * 60 + entry.minute);

        let earliest = entries[0];
        let offset = whole_hour_offset(earliest.timezone_offset_ms);
        let instant = Utc
            .timestamp_millis_opt(earliest.datetime)
            .single()
            .ok_or_else(|| {
                ImportError::Format(format!(
                    "day entry timestamp out of range: {}",
                    earliest.datetime
                ))
            })?;

        let lines: Vec<String> = entries
            .iter()
            .map(|entry| entry_line(entry, &moods, &tag_names))
            .collect();

        let mut record = MemoryRecord::new(
            DAYLIO_SOURCE,
            format!("{TITLE_LABEL}: {day}"),
            instant.with_timezone(&offset),
        );
        record
            .metadata
            .insert(META_ENTRY_COUNT.to_string(), entries.len().to_string());
        record.metadata.insert(META_DAY_KEY.to_string(), day);
        record.content = Some(lines.join("\n"));
        records.push(record);
    }

    // Day-key order and instant order can disagree across offsets; the
    // instant wins. Stable sort keeps day-key order for equal instants.
    records.sort_by_key(|record| record.memory_created_at.timestamp_millis());
    Ok(records)
}

fn read_backup(path: &Path) -> Result<DaylioBackup, ImportError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|err| ImportError::Format(format!("unreadable archive: {err}")))?;

    let mut entry = archive.by_name(BACKUP_ENTRY_NAME).map_err(|err| {
        ImportError::Format(format!("missing `{BACKUP_ENTRY_NAME}` entry: {err}"))
    })?;
    let mut encoded = String::new();
    entry.read_to_string(&mut encoded)?;

    let decoded = BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|err| ImportError::Format(format!("payload is not valid base64: {err}")))?;

    serde_json::from_slice(&decoded)
        .map_err(|err| ImportError::Format(format!("payload is not a valid backup: {err}")))
}

/// Formats the fixed-width day-key. `month` is 0-indexed in the backup.
fn day_key(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{:02}-{day:02}", month + 1)
}

/// Maps a millisecond UTC offset onto a whole-hour fixed offset.
///
/// Minutes are rounded, then truncated to hours, so fractional-hour zones
/// collapse onto the nearest lower whole hour. Known lossy; do not "fix".
fn whole_hour_offset(offset_ms: i64) -> FixedOffset {
    let minutes = (offset_ms as f64 / 60_000.0).round() as i32;
    let hours = (minutes / 60).clamp(-23, 23);
    FixedOffset::east_opt(hours * 3600).expect("whole-hour offset is within chrono bounds")
}

fn entry_line(
    entry: &DayEntry,
    moods: &HashMap<i64, &DaylioMood>,
    tag_names: &HashMap<i64, &str>,
) -> String {
    let mood = resolve_mood_name(moods, entry.mood);
    let mut line = format!("{mood}: {}", entry.note);
    if entry.note.is_empty() {
        line.truncate(line.trim_end().len());
    }

    let known_tags: Vec<&str> = entry
        .tags
        .iter()
        .filter_map(|id| tag_names.get(id).copied())
        .collect();
    if !known_tags.is_empty() {
        line.push_str(&format!(" ({})", known_tags.join(", ")));
    }
    line
}

/// Resolves a mood reference to a display name.
///
/// Preference order: non-empty custom name, then the predefined group
/// table, then the `Unknown` placeholder. Never fails.
fn resolve_mood_name(moods: &HashMap<i64, &DaylioMood>, mood_id: i64) -> String {
    let Some(mood) = moods.get(&mood_id) else {
        return UNKNOWN_MOOD_NAME.to_string();
    };

    if !mood.custom_name.is_empty() {
        return mood.custom_name.clone();
    }

    match mood.mood_group_id {
        1..=5 => PREDEFINED_MOOD_NAMES[(mood.mood_group_id - 1) as usize].to_string(),
        _ => UNKNOWN_MOOD_NAME.to_string(),
    }
}
