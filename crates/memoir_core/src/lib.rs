//! Core import/export pipeline for Memoir.
//!
//! Normalizes Daylio backup archives and Obsidian note vaults into one
//! canonical record shape, persists them through the repository layer, and
//! flattens stored records back out into per-period text files. This crate
//! is the single source of truth for the pipeline's invariants.

pub mod db;
pub mod export;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory};
pub use export::period::{export_periods, ExportPeriod};
pub use export::ExportError;
pub use import::daylio::{import_daylio_archive, DAYLIO_SOURCE};
pub use import::obsidian::{import_obsidian_vault, OBSIDIAN_SOURCE};
pub use import::ImportError;
pub use logging::{default_log_level, init_logging};
pub use model::record::{
    MemoryRecord, RecordValidationError, StoredMemoryRecord, META_DAY_KEY, META_ENTRY_COUNT,
    META_ORIGINAL_PATH,
};
pub use repo::memory_repo::{MemoryRepository, RepoError, RepoResult, SqliteMemoryRepository};
pub use service::journal_service::{JournalService, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
