//! Export of stored records into flattened period text files.
//!
//! # Responsibility
//! - Re-group canonical records by calendar day, then by month or year.
//! - Serialize each group into a human-readable text block.
//!
//! # Invariants
//! - Export never mutates stored records; it borrows a fetched list.
//! - Output deliberately drops `id` and `source`; it is not re-importable.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod period;

/// Fatal export failure.
#[derive(Debug)]
pub enum ExportError {
    /// Filesystem failure while writing an output file.
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
