use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use memoir_core::{import_obsidian_vault, META_ORIGINAL_PATH};
use std::fs;
use std::path::Path;

fn write_note(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn iso_filename_beats_modification_time() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "2025-09-11T14:30:00+02:00.md", "standup notes");

    let records = import_obsidian_vault(dir.path()).unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.source, "obsidian");
    assert_eq!(record.title, "2025-09-11T14:30:00+02:00");
    assert_eq!(
        record.memory_created_at.to_rfc3339(),
        "2025-09-11T14:30:00+02:00"
    );
    // The file was written just now; the parsed instant must not be mtime.
    let modified = fs::metadata(dir.path().join("2025-09-11T14:30:00+02:00.md"))
        .unwrap()
        .modified()
        .unwrap();
    assert_ne!(
        record.memory_created_at,
        DateTime::<Local>::from(modified).fixed_offset()
    );
    assert_eq!(record.content.as_deref(), Some("standup notes"));
}

#[test]
fn zulu_filename_parses_as_utc() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "2025-09-11T06:15:00Z morning.md", "early entry");

    let records = import_obsidian_vault(dir.path()).unwrap();
    assert_eq!(
        records[0].memory_created_at.to_rfc3339(),
        "2025-09-11T06:15:00+00:00"
    );
}

#[test]
fn bare_date_filename_is_local_midnight() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "2025-09-11 retro.md", "what went well");

    let records = import_obsidian_vault(dir.path()).unwrap();
    assert_eq!(
        records[0].memory_created_at.naive_local(),
        NaiveDate::from_ymd_opt(2025, 9, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
}

#[test]
fn undated_filename_falls_back_to_modification_time() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "shopping list.md", "eggs, bread");

    let records = import_obsidian_vault(dir.path()).unwrap();
    let modified = fs::metadata(dir.path().join("shopping list.md"))
        .unwrap()
        .modified()
        .unwrap();
    let expected: DateTime<FixedOffset> = DateTime::<Local>::from(modified).fixed_offset();
    assert_eq!(records[0].memory_created_at, expected);
    assert_eq!(records[0].title, "shopping list");
}

#[test]
fn reserved_directory_is_excluded_at_any_depth() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "keep.md", "kept");
    write_note(dir.path(), ".obsidian/config.md", "never content");
    write_note(dir.path(), "nested/.obsidian/2025-09-11.md", "never content");

    let records = import_obsidian_vault(dir.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "keep");
}

#[test]
fn dotfiles_and_other_extensions_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "real note.md", "body");
    write_note(dir.path(), ".hidden.md", "skipped");
    write_note(dir.path(), "attachment.txt", "skipped");
    write_note(dir.path(), "archive.md.bak", "skipped");

    let records = import_obsidian_vault(dir.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "real note");
}

#[test]
fn original_path_is_relative_to_the_vault_root() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "projects/garden/2025-09-11 plan.md", "seeds");

    let records = import_obsidian_vault(dir.path()).unwrap();
    assert_eq!(
        records[0].metadata.get(META_ORIGINAL_PATH).map(String::as_str),
        Some("projects/garden/2025-09-11 plan.md")
    );
}

#[test]
fn traversal_is_stable_and_recursive() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "b.md", "two");
    write_note(dir.path(), "a.md", "one");
    write_note(dir.path(), "sub/c.md", "three");

    let records = import_obsidian_vault(dir.path()).unwrap();
    let titles: Vec<&str> = records.iter().map(|record| record.title.as_str()).collect();
    assert_eq!(titles, ["a", "b", "c"]);
}

#[test]
fn empty_vault_yields_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let records = import_obsidian_vault(dir.path()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn missing_vault_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(import_obsidian_vault(&missing).is_err());
}

#[test]
fn non_utf8_note_content_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x01]).unwrap();
    write_note(dir.path(), "fine.md", "ok");

    assert!(import_obsidian_vault(dir.path()).is_err());
}
