//! Importers that normalize external journal exports into memory records.
//!
//! # Responsibility
//! - Convert each supported external schema into the canonical record shape.
//! - Keep the shared import error taxonomy in one place.
//!
//! # Invariants
//! - An importer either returns a complete record list or fails before
//!   returning any records; there is no partial success.
//! - Lookup misses inside a valid document are non-fatal and resolved to
//!   placeholders; format and filesystem failures are fatal.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod daylio;
pub mod obsidian;

/// Fatal import failure.
#[derive(Debug)]
pub enum ImportError {
    /// Malformed source data: bad archive, base64, JSON or missing fields.
    Format(String),
    /// Filesystem failure while reading source data.
    Io(std::io::Error),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(message) => write!(f, "invalid source format: {message}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
