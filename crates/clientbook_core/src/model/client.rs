//! Client and phone domain model.
//!
//! # Responsibility
//! - Define persisted client/phone records and the flat search row shape.
//! - Define create/update request models, including the phone tri-state.
//!
//! # Invariants
//! - `ClientId`/`PhoneId` are database-assigned and strictly increasing.
//! - `email` is unique across clients when present.
//! - `PhoneUpdate::Keep` and `PhoneUpdate::Replace(vec![])` are different
//!   requests: the first leaves phones alone, the second removes all of them.

use serde::{Deserialize, Serialize};

/// Database-assigned client identifier.
pub type ClientId = i64;

/// Database-assigned phone identifier.
pub type PhoneId = i64;

/// Persisted client row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Persisted phone row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: PhoneId,
    pub client_id: ClientId,
    pub phone_number: String,
}

/// One client together with all phones it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client: Client,
    /// Ordered by phone id (insertion order).
    pub phones: Vec<Phone>,
}

impl ClientRecord {
    /// Returns phone numbers in insertion order.
    pub fn phone_numbers(&self) -> Vec<&str> {
        self.phones
            .iter()
            .map(|phone| phone.phone_number.as_str())
            .collect()
    }
}

/// Flat row produced by client search: one row per (client, phone) pair.
///
/// `phone_number` is `None` for clients that own no phones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRow {
    pub client_id: ClientId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Request model for creating a client.
///
/// Blank name/email values are stored as `NULL`, same as in [`ClientPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Inserted in order; duplicates are kept.
    pub phones: Vec<String>,
}

impl NewClient {
    /// Builds a request with all three name/email fields set and no phones.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            phones: Vec::new(),
        }
    }

    /// Replaces the phone list of this request.
    pub fn with_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = phones.into_iter().map(Into::into).collect();
        self
    }
}

/// What to do with a client's phones during an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "phones")]
pub enum PhoneUpdate {
    /// Phones argument omitted: existing phones stay untouched.
    #[default]
    Keep,
    /// Delete every existing phone, then insert this list (may be empty).
    Replace(Vec<String>),
}

impl PhoneUpdate {
    /// Builds a replacement from any iterable of numbers.
    pub fn replace<I, S>(phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Replace(phones.into_iter().map(Into::into).collect())
    }
}

/// Partial update for one client.
///
/// Scalar fields:
/// - `None` leaves the column untouched.
/// - `Some(value)` sets the column; a value that is blank after trimming
///   clears the column to `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phones: PhoneUpdate,
}

impl ClientPatch {
    /// Returns whether this patch would change nothing.
    pub(crate) fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phones == PhoneUpdate::Keep
    }
}

/// Maps a supplied scalar value to what gets stored: blank clears to `NULL`.
pub(crate) fn stored_value(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
