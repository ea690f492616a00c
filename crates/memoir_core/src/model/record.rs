//! Canonical memory record.
//!
//! # Responsibility
//! - Define the normalized record exchanged between importers, the store
//!   and the period exporter.
//! - Provide required-field validation for store write paths.
//!
//! # Invariants
//! - `memory_created_at` carries the offset of the underlying event, not
//!   the import time; it is never adjusted after construction.
//! - `metadata` keys are unique; recognized keys are the `META_*` consts.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Metadata key for the `YYYY-MM-DD` grouping key of a mood-archive day.
pub const META_DAY_KEY: &str = "dayKey";
/// Metadata key for the number of mood entries folded into one day record.
pub const META_ENTRY_COUNT: &str = "entryCount";
/// Metadata key for a note file's path relative to the vault root.
pub const META_ORIGINAL_PATH: &str = "originalPath";

/// Normalized record produced by importers and consumed by the exporter.
///
/// The shape carries no behavior beyond required-field validation; each
/// importer is responsible for deriving `title`, `memory_created_at` and
/// `metadata` according to its own rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Fixed literal identifying the origin importer.
    pub source: String,
    /// Human-readable label, importer-specific derivation.
    pub title: String,
    /// When the underlying event occurred, offset preserved.
    pub memory_created_at: DateTime<FixedOffset>,
    /// Importer-specific provenance, string key to string value.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Optional free text body.
    pub content: Option<String>,
    /// Reserved raw binary payload. Unused by current importers.
    pub content_blob: Option<Vec<u8>>,
}

/// A memory record as read back from the store, with store-assigned fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMemoryRecord {
    /// Opaque unique identifier assigned at insert time.
    pub id: Uuid,
    /// Ingestion timestamp assigned at insert time.
    pub created_at: DateTime<Utc>,
    /// The importer-produced record, stored wholesale.
    pub record: MemoryRecord,
}

/// Required-field violation detected before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// `source` is empty.
    EmptySource,
    /// `title` is empty.
    EmptyTitle,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySource => write!(f, "record source must not be empty"),
            Self::EmptyTitle => write!(f, "record title must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}

impl MemoryRecord {
    /// Creates a record with empty metadata and no content.
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        memory_created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            memory_created_at,
            metadata: BTreeMap::new(),
            content: None,
            content_blob: None,
        }
    }

    /// Checks required fields before persistence.
    ///
    /// # Contract
    /// - Store write paths must call this before SQL mutations.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.source.is_empty() {
            return Err(RecordValidationError::EmptySource);
        }
        if self.title.is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }
        Ok(())
    }
}
