//! End-to-end flow: import both sources, then export one month.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use memoir_core::{
    open_db_in_memory, ExportPeriod, JournalService, MemoryRepository, SqliteMemoryRepository,
};
use serde_json::json;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_backup(dir: &Path) -> PathBuf {
    // Two mood entries on 2025-09-11, earliest at 08:00 UTC.
    let backup = json!({
        "customMoods": [{"id": 1, "custom_name": "", "mood_group_id": 2}],
        "tags": [{"id": 10, "name": "work"}],
        "dayEntries": [
            {
                "mood": 1, "tags": [10], "note": "standup ran long",
                "year": 2025, "month": 8, "day": 11, "hour": 8, "minute": 0,
                "datetime": 1_757_577_600_000i64, "timeZoneOffset": 0
            },
            {
                "mood": 1, "tags": [], "note": "quiet afternoon",
                "year": 2025, "month": 8, "day": 11, "hour": 15, "minute": 30,
                "datetime": 1_757_604_600_000i64, "timeZoneOffset": 0
            }
        ],
    });
    let encoded = BASE64_STANDARD.encode(backup.to_string());

    let archive_path = dir.join("backup.daylio.zip");
    let mut writer = ZipWriter::new(File::create(&archive_path).unwrap());
    writer
        .start_file(
            "backup.daylio",
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
        )
        .unwrap();
    writer.write_all(encoded.as_bytes()).unwrap();
    writer.finish().unwrap();
    archive_path
}

fn write_vault(dir: &Path) -> PathBuf {
    let vault = dir.join("vault");
    fs::create_dir_all(vault.join(".obsidian")).unwrap();
    fs::write(vault.join(".obsidian").join("app.md"), "tool config").unwrap();
    fs::write(
        vault.join("2025-09-11T18:00:00Z evening.md"),
        "walked the long way home",
    )
    .unwrap();
    vault
}

#[test]
fn import_both_sources_then_export_month() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    let service = JournalService::new(repo);

    let archive = write_backup(dir.path());
    let vault = write_vault(dir.path());

    assert_eq!(service.import_daylio(&archive).unwrap(), 1);
    assert_eq!(service.import_obsidian(&vault).unwrap(), 1);

    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    service.export(&out, ExportPeriod::Month).unwrap();

    let body = fs::read_to_string(out.join("September2025.txt")).unwrap();
    // Both records share the 2025-09-11 block, daylio first (earlier
    // instant), separated by the horizontal rule.
    let expected = "<2025-09-11>\n\
        ## Daylio: 2025-09-11\n\
        Time: 08:00\n\
        Good: standup ran long (work)\nGood: quiet afternoon\n\
        \n\
        ---\n\
        \n\
        ## 2025-09-11T18:00:00Z evening\n\
        Time: 18:00\n\
        walked the long way home\n\
        </2025-09-11>\n";
    assert_eq!(body, expected);
}

#[test]
fn repeated_imports_always_insert_again() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let archive = write_backup(dir.path());
    {
        let service = JournalService::new(SqliteMemoryRepository::try_new(&conn).unwrap());
        service.import_daylio(&archive).unwrap();
        service.import_daylio(&archive).unwrap();
    }

    // No dedup by design: two imports, two rows.
    assert_eq!(repo.list_all().unwrap().len(), 2);
}

#[test]
fn export_from_empty_store_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let service = JournalService::new(SqliteMemoryRepository::try_new(&conn).unwrap());

    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    service.export(&out, ExportPeriod::Month).unwrap();
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}
