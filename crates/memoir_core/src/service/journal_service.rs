//! Journal import/export orchestration.
//!
//! # Responsibility
//! - Run an importer and hand its complete batch to the store exactly once.
//! - Fetch the full ordered record list and hand it to the exporter.
//!
//! # Invariants
//! - No deduplication, no retries, no partial commits: a failing importer
//!   call inserts nothing, and repeated imports always insert again.

use crate::export::period::{export_periods, ExportPeriod};
use crate::export::ExportError;
use crate::import::daylio::import_daylio_archive;
use crate::import::obsidian::import_obsidian_vault;
use crate::import::ImportError;
use crate::repo::memory_repo::{MemoryRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Combined error for service-level orchestration.
#[derive(Debug)]
pub enum ServiceError {
    Import(ImportError),
    Export(ExportError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Import(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Import(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper around a memory repository.
pub struct JournalService<R: MemoryRepository> {
    repo: R,
}

impl<R: MemoryRepository> JournalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Imports a Daylio backup archive and stores the complete batch.
    ///
    /// Returns the number of day records inserted.
    pub fn import_daylio(&self, archive: &Path) -> Result<usize, ServiceError> {
        let records = import_daylio_archive(archive)?;
        self.repo.insert_batch(&records)?;
        Ok(records.len())
    }

    /// Imports an Obsidian vault and stores the complete batch.
    ///
    /// Returns the number of note records inserted.
    pub fn import_obsidian(&self, vault: &Path) -> Result<usize, ServiceError> {
        let records = import_obsidian_vault(vault)?;
        self.repo.insert_batch(&records)?;
        Ok(records.len())
    }

    /// Exports every stored record into per-period files under `dest`.
    pub fn export(&self, dest: &Path, period: ExportPeriod) -> Result<(), ServiceError> {
        let records = self.repo.list_all()?;
        export_periods(&records, dest, period)?;
        Ok(())
    }
}
