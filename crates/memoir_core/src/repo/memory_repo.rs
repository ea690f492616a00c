//! Memory record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the batch insert and ordered list APIs over `memories` storage.
//! - Assign store-owned fields (`id`, `created_at`) at insert time.
//!
//! # Invariants
//! - `insert_batch` runs in one transaction; a validation or SQL failure
//!   rolls back every record of the call.
//! - `list_all` orders ascending by the `memory_created_at` instant with
//!   insertion order as the tie-break.

use crate::db::DbError;
use crate::model::record::{MemoryRecord, RecordValidationError, StoredMemoryRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMORY_SELECT_SQL: &str = "SELECT
    id,
    source,
    title,
    memory_created_at,
    metadata,
    content,
    content_blob,
    created_at
FROM memories";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for memory persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memory data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Insert/list contract consumed by importer and exporter orchestration.
pub trait MemoryRepository {
    /// Appends all given records in one transaction, assigning `id` and
    /// `created_at` to each. Returns the assigned ids in input order.
    fn insert_batch(&self, records: &[MemoryRecord]) -> RepoResult<Vec<Uuid>>;

    /// Returns every stored record, ascending by `memory_created_at`.
    fn list_all(&self) -> RepoResult<Vec<StoredMemoryRecord>>;
}

/// SQLite-backed repository over an open core connection.
pub struct SqliteMemoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoryRepository<'conn> {
    /// Wraps an open connection that already passed db bootstrap.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        // Cheap probe so a missing migration surfaces here, not mid-batch.
        conn.query_row("SELECT COUNT(*) FROM memories", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(Self { conn })
    }
}

impl MemoryRepository for SqliteMemoryRepository<'_> {
    fn insert_batch(&self, records: &[MemoryRecord]) -> RepoResult<Vec<Uuid>> {
        for record in records {
            record.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO memories (
                    id, source, title, memory_created_at, memory_epoch_ms,
                    metadata, content, content_blob, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for record in records {
                let id = Uuid::new_v4();
                let created_at = Utc::now();
                let metadata = serde_json::to_string(&record.metadata).map_err(|err| {
                    RepoError::InvalidData(format!("metadata not serializable: {err}"))
                })?;

                stmt.execute(params![
                    id.to_string(),
                    record.source,
                    record.title,
                    record.memory_created_at.to_rfc3339(),
                    record.memory_created_at.timestamp_millis(),
                    metadata,
                    record.content,
                    record.content_blob,
                    created_at.to_rfc3339(),
                ])?;
                ids.push(id);
            }
        }
        tx.commit()?;

        Ok(ids)
    }

    fn list_all(&self) -> RepoResult<Vec<StoredMemoryRecord>> {
        let sql = format!("{MEMORY_SELECT_SQL} ORDER BY memory_epoch_ms ASC, rowid ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_stored_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }
}

type RowResult = Result<StoredMemoryRecord, RepoError>;

fn row_to_stored_record(row: &Row<'_>) -> rusqlite::Result<RowResult> {
    let id_text: String = row.get(0)?;
    let source: String = row.get(1)?;
    let title: String = row.get(2)?;
    let memory_created_at_text: String = row.get(3)?;
    let metadata_text: String = row.get(4)?;
    let content: Option<String> = row.get(5)?;
    let content_blob: Option<Vec<u8>> = row.get(6)?;
    let created_at_text: String = row.get(7)?;

    Ok(decode_stored_record(
        id_text,
        source,
        title,
        memory_created_at_text,
        metadata_text,
        content,
        content_blob,
        created_at_text,
    ))
}

#[allow(clippy::too_many_arguments)]
fn decode_stored_record(
    id_text: String,
    source: String,
    title: String,
    memory_created_at_text: String,
    metadata_text: String,
    content: Option<String>,
    content_blob: Option<Vec<u8>>,
    created_at_text: String,
) -> RowResult {
    let id = Uuid::parse_str(&id_text)
        .map_err(|err| RepoError::InvalidData(format!("bad record id `{id_text}`: {err}")))?;
    let memory_created_at = DateTime::parse_from_rfc3339(&memory_created_at_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "bad memory_created_at `{memory_created_at_text}`: {err}"
        ))
    })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_text)
        .map_err(|err| RepoError::InvalidData(format!("bad created_at `{created_at_text}`: {err}")))?
        .with_timezone(&Utc);
    let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata_text)
        .map_err(|err| RepoError::InvalidData(format!("bad metadata json: {err}")))?;

    Ok(StoredMemoryRecord {
        id,
        created_at,
        record: MemoryRecord {
            source,
            title,
            memory_created_at,
            metadata,
            content,
            content_blob,
        },
    })
}
