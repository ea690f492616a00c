//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the insert/list contract importers and the exporter rely on.
//! - Isolate SQLite query details from import/export orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `MemoryRecord::validate()` before
//!   persistence.
//! - Batch inserts are all-or-nothing within one call.

pub mod memory_repo;
