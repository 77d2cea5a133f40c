//! Filtered client search over `clients LEFT JOIN phones`.
//!
//! # Responsibility
//! - Translate a [`ClientFilter`] into a list of typed predicates.
//! - Render predicates into SQL with bound parameters only.
//! - Return one [`ClientRow`] per (client, phone) pair.
//!
//! # Invariants
//! - Caller-supplied text is always bound, never spliced into SQL.
//! - Blank criteria are skipped; no criteria returns every row.
//! - Rows are ordered by client id, then phone id.

use crate::db::{DbResult, CI_CONTAINS_FN};
use crate::model::client::ClientRow;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

const CLIENT_ROW_SELECT_SQL: &str = "SELECT
    c.id AS client_id,
    c.first_name AS first_name,
    c.last_name AS last_name,
    c.email AS email,
    p.phone_number AS phone_number
FROM clients c
LEFT JOIN phones p ON p.client_id = c.id
WHERE 1 = 1";

/// Search criteria. Every field is a case-insensitive substring filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientFilter {
    pub fn by_first_name(value: impl Into<String>) -> Self {
        Self {
            first_name: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_last_name(value: impl Into<String>) -> Self {
        Self {
            last_name: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_email(value: impl Into<String>) -> Self {
        Self {
            email: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_phone(value: impl Into<String>) -> Self {
        Self {
            phone: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Column a predicate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl SearchField {
    fn column(self) -> &'static str {
        match self {
            Self::FirstName => "c.first_name",
            Self::LastName => "c.last_name",
            Self::Email => "c.email",
            Self::Phone => "p.phone_number",
        }
    }
}

/// One `field contains needle` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: SearchField,
    pub needle: String,
}

/// Incremental builder: starts from "match everything" and narrows by one
/// predicate per supplied criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientQuery {
    predicates: Vec<Predicate>,
}

impl ClientQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the predicate list for a filter, in field order.
    pub fn from_filter(filter: &ClientFilter) -> Self {
        Self::new()
            .contains(SearchField::FirstName, filter.first_name.as_deref())
            .contains(SearchField::LastName, filter.last_name.as_deref())
            .contains(SearchField::Email, filter.email.as_deref())
            .contains(SearchField::Phone, filter.phone.as_deref())
    }

    /// Appends a substring predicate; `None` and empty needles are ignored.
    pub fn contains(mut self, field: SearchField, needle: Option<&str>) -> Self {
        if let Some(needle) = needle.filter(|value| !value.is_empty()) {
            self.predicates.push(Predicate {
                field,
                needle: needle.to_string(),
            });
        }
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Renders SQL text and its positional bind values.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(CLIENT_ROW_SELECT_SQL);
        let mut bind_values = Vec::with_capacity(self.predicates.len());

        for predicate in &self.predicates {
            sql.push_str(&format!(
                " AND {CI_CONTAINS_FN}({}, ?) = 1",
                predicate.field.column()
            ));
            bind_values.push(Value::Text(predicate.needle.clone()));
        }

        sql.push_str(" ORDER BY c.id ASC, p.id ASC");
        (sql, bind_values)
    }

    /// Executes the query on a bootstrapped connection.
    pub fn fetch(&self, conn: &Connection) -> DbResult<Vec<ClientRow>> {
        let (sql, bind_values) = self.to_sql();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut result = Vec::new();

        while let Some(row) = rows.next()? {
            result.push(parse_client_row(row)?);
        }

        Ok(result)
    }
}

/// Finds clients matching every supplied criterion.
///
/// Requires a connection from [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`] so that `ci_contains` is registered.
pub fn find_clients(conn: &Connection, filter: &ClientFilter) -> DbResult<Vec<ClientRow>> {
    ClientQuery::from_filter(filter).fetch(conn)
}

fn parse_client_row(row: &Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        client_id: row.get("client_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone_number: row.get("phone_number")?,
    })
}
