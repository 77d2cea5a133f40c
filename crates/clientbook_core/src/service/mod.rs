//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Emit metadata-only diagnostic events around each use-case.

pub mod client_service;
