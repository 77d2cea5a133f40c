//! Client search entry points.
//!
//! # Responsibility
//! - Build filtered `clients LEFT JOIN phones` queries from typed predicates.
//! - Keep result shaping inside core.

pub mod client_search;
