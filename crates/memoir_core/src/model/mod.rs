//! Canonical domain model shared by importers, store and exporter.
//!
//! # Responsibility
//! - Define the one normalized record shape every importer produces.
//! - Keep store-assigned fields separate from importer-assigned fields.
//!
//! # Invariants
//! - `memory_created_at` is always present and timezone-aware; it is the
//!   sole ordering key for storage reads and export grouping.
//! - Importers never assign `id` or `created_at`; the store does.

pub mod record;
