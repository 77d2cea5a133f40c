//! Custom SQL functions registered on every core connection.
//!
//! SQLite's built-in `LIKE`/`lower()` only fold ASCII, so Cyrillic and other
//! non-ASCII names would match case-sensitively. `ci_contains` folds with
//! Rust's Unicode-aware lowercasing instead.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the case-insensitive substring predicate.
///
/// `ci_contains(haystack, needle)` returns `NULL` when either side is `NULL`,
/// otherwise `1`/`0`.
pub const CI_CONTAINS_FN: &str = "ci_contains";

/// Registers core SQL functions on the given connection.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CI_CONTAINS_FN,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?;
            let needle = ctx.get::<Option<String>>(1)?;
            Ok(match (haystack, needle) {
                (Some(haystack), Some(needle)) => Some(contains_ignore_case(&haystack, &needle)),
                _ => None,
            })
        },
    )
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
