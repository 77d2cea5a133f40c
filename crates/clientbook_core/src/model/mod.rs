//! Domain model for the client directory.
//!
//! # Responsibility
//! - Define the records read from and written to `clients`/`phones`.
//! - Define request shapes for create/update use-cases.
//!
//! # Invariants
//! - Identifiers are assigned by the database and never reused.
//! - A phone never outlives its owning client.

pub mod client;
