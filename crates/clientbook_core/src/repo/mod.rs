//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every write operation runs in exactly one transaction.
//! - Repository APIs return semantic errors (`NotFound`, constraint
//!   violations) in addition to DB transport errors.

pub mod client_repo;
