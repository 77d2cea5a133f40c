//! Core domain logic for the client directory.
//! This crate owns the schema, persistence rules and search semantics for
//! clients and their phone numbers.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{AppConfig, ConfigError, DbLocation};
pub use db::{create_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, parse_level, LogConfig};
pub use model::client::{
    Client, ClientId, ClientPatch, ClientRecord, ClientRow, NewClient, Phone, PhoneId,
    PhoneUpdate,
};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};
pub use search::client_search::{find_clients, ClientFilter, ClientQuery, SearchField};
pub use service::client_service::ClientService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
