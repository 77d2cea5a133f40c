//! Client/phone repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete APIs over `clients` and `phones`.
//! - Classify SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - One public call = one transaction; a failure leaves nothing applied.
//! - Phone cascade on client delete is enforced by the schema, not here.
//! - Writes against an unknown client return `RepoError::NotFound`.

use crate::db::DbError;
use crate::model::client::{
    stored_value, Client, ClientId, ClientPatch, ClientRecord, ClientRow, NewClient, Phone,
    PhoneId, PhoneUpdate,
};
use crate::search::client_search::{find_clients, ClientFilter};
use rusqlite::{ffi, params, Connection, OptionalExtension, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ClientId),
    /// A `UNIQUE` constraint rejected the write (duplicate email).
    UniqueViolation(String),
    /// A `FOREIGN KEY` constraint rejected the write.
    ForeignKeyViolation(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::UniqueViolation(message) => write!(f, "unique constraint violated: {message}"),
            Self::ForeignKeyViolation(message) => {
                write!(f, "foreign key constraint violated: {message}")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::UniqueViolation(_)
            | Self::ForeignKeyViolation(_)
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl RepoError {
    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(DbError::Open(_)) => "db_open_failed",
            Self::Db(_) => "db_error",
            Self::NotFound(_) => "not_found",
            Self::UniqueViolation(_) => "unique_violation",
            Self::ForeignKeyViolation(_) => "foreign_key_violation",
            Self::MissingRequiredTable(_) => "missing_table",
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::UniqueViolation(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Self::ForeignKeyViolation(detail);
                }
                _ => {}
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for client directory operations.
pub trait ClientRepository {
    /// Creates a client and its phones; returns the new client id.
    fn create_client(&mut self, client: &NewClient) -> RepoResult<ClientId>;
    /// Attaches one phone number to an existing client.
    fn add_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<PhoneId>;
    /// Applies a partial update, optionally replacing the phone list.
    fn update_client(&mut self, client_id: ClientId, patch: &ClientPatch) -> RepoResult<()>;
    /// Removes every phone of the client equal to `phone`; returns how many.
    fn delete_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<usize>;
    /// Removes a client; its phones go with it.
    fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()>;
    /// Loads one client with its phones.
    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<ClientRecord>>;
    /// Runs a filtered search, one row per (client, phone) pair.
    fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientRow>>;
}

/// SQLite-backed client repository.
///
/// Borrows the connection mutably for its lifetime, so one connection can
/// only ever serve one repository at a time.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `RepoError::MissingRequiredTable` when the schema was never created.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["clients", "phones"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn create_client(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO clients (first_name, last_name, email) VALUES (?1, ?2, ?3);",
            params![
                client.first_name.as_deref().and_then(stored_value),
                client.last_name.as_deref().and_then(stored_value),
                client.email.as_deref().and_then(stored_value),
            ],
        )?;
        let client_id = tx.last_insert_rowid();

        for phone in &client.phones {
            insert_phone(&tx, client_id, phone)?;
        }

        tx.commit()?;
        Ok(client_id)
    }

    fn add_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<PhoneId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !client_exists(&tx, client_id)? {
            return Err(RepoError::NotFound(client_id));
        }

        let phone_id = insert_phone(&tx, client_id, phone)?;
        tx.commit()?;
        Ok(phone_id)
    }

    fn update_client(&mut self, client_id: ClientId, patch: &ClientPatch) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !client_exists(&tx, client_id)? {
            return Err(RepoError::NotFound(client_id));
        }
        if patch.is_empty() {
            return Ok(());
        }

        if let Some(first_name) = patch.first_name.as_deref() {
            tx.execute(
                "UPDATE clients SET first_name = ?1 WHERE id = ?2;",
                params![stored_value(first_name), client_id],
            )?;
        }
        if let Some(last_name) = patch.last_name.as_deref() {
            tx.execute(
                "UPDATE clients SET last_name = ?1 WHERE id = ?2;",
                params![stored_value(last_name), client_id],
            )?;
        }
        if let Some(email) = patch.email.as_deref() {
            tx.execute(
                "UPDATE clients SET email = ?1 WHERE id = ?2;",
                params![stored_value(email), client_id],
            )?;
        }

        if let PhoneUpdate::Replace(phones) = &patch.phones {
            tx.execute("DELETE FROM phones WHERE client_id = ?1;", [client_id])?;
            for phone in phones {
                insert_phone(&tx, client_id, phone)?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM phones WHERE client_id = ?1 AND phone_number = ?2;",
            params![client_id, phone],
        )?;
        Ok(removed)
    }

    fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [client_id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(client_id));
        }

        Ok(())
    }

    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<ClientRecord>> {
        let client = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, email FROM clients WHERE id = ?1;",
                [client_id],
                |row| {
                    Ok(Client {
                        id: row.get("id")?,
                        first_name: row.get("first_name")?,
                        last_name: row.get("last_name")?,
                        email: row.get("email")?,
                    })
                },
            )
            .optional()?;

        let Some(client) = client else {
            return Ok(None);
        };

        let phones = load_phones(self.conn, client_id)?;
        Ok(Some(ClientRecord { client, phones }))
    }

    fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientRow>> {
        Ok(find_clients(self.conn, filter)?)
    }
}

/// Inserts one phone row; shared by create, add and replace paths.
fn insert_phone(conn: &Connection, client_id: ClientId, phone: &str) -> RepoResult<PhoneId> {
    conn.execute(
        "INSERT INTO phones (client_id, phone_number) VALUES (?1, ?2);",
        params![client_id, phone],
    )?;
    Ok(conn.last_insert_rowid())
}

fn load_phones(conn: &Connection, client_id: ClientId) -> RepoResult<Vec<Phone>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, phone_number
         FROM phones
         WHERE client_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([client_id])?;
    let mut phones = Vec::new();
    while let Some(row) = rows.next()? {
        phones.push(Phone {
            id: row.get("id")?,
            client_id: row.get("client_id")?,
            phone_number: row.get("phone_number")?,
        });
    }
    Ok(phones)
}

fn client_exists(conn: &Connection, client_id: ClientId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM clients WHERE id = ?1);",
        [client_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
