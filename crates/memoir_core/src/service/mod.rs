//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate importer, repository and exporter calls into one API.
//! - Keep CLI wiring decoupled from storage and format details.

pub mod journal_service;
