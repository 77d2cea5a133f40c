//! Client directory use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for every client directory operation.
//! - Delegate persistence to repository implementations.
//! - Log one `event=<op>` line per call with status and duration.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Log lines carry ids and counts only, never names, emails or numbers.

use crate::model::client::{ClientId, ClientPatch, ClientRecord, ClientRow, NewClient, PhoneId};
use crate::repo::client_repo::{ClientRepository, RepoResult};
use crate::search::client_search::ClientFilter;
use log::{debug, warn};
use std::time::Instant;

/// Use-case service wrapper for client directory operations.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a client with its phones in one transaction.
    ///
    /// Returns `RepoError::UniqueViolation` when the email is already taken.
    pub fn create_client(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        let started_at = Instant::now();
        let result = self.repo.create_client(client);
        match &result {
            Ok(id) => debug!(
                "event=client_create module=service status=ok client_id={id} phones={} duration_ms={}",
                client.phones.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=client_create module=service status=error error_code={} duration_ms={}",
                err.code(),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    /// Attaches one phone number to an existing client.
    pub fn add_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<PhoneId> {
        let started_at = Instant::now();
        let result = self.repo.add_phone(client_id, phone);
        log_outcome("phone_add", client_id, &result, started_at);
        result
    }

    /// Applies a partial update.
    ///
    /// # Contract
    /// - `patch.phones == PhoneUpdate::Keep` leaves phones untouched.
    /// - `PhoneUpdate::Replace(list)` swaps the full phone set, even for an
    ///   empty list.
    /// - Unknown client returns `RepoError::NotFound`.
    pub fn update_client(&mut self, client_id: ClientId, patch: &ClientPatch) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.update_client(client_id, patch);
        log_outcome("client_update", client_id, &result, started_at);
        result
    }

    /// Deletes matching phone rows; zero matches is not an error.
    pub fn delete_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.delete_phone(client_id, phone);
        if let Ok(removed) = &result {
            debug!(
                "event=phone_delete module=service status=ok client_id={client_id} removed={removed} duration_ms={}",
                started_at.elapsed().as_millis()
            );
        } else {
            log_outcome("phone_delete", client_id, &result, started_at);
        }
        result
    }

    /// Deletes a client and, by cascade, its phones.
    pub fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_client(client_id);
        log_outcome("client_delete", client_id, &result, started_at);
        result
    }

    /// Gets one client with its phones.
    pub fn get_client(&self, client_id: ClientId) -> RepoResult<Option<ClientRecord>> {
        self.repo.get_client(client_id)
    }

    /// Searches clients; see [`ClientFilter`] for matching rules.
    pub fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientRow>> {
        let started_at = Instant::now();
        let result = self.repo.find_clients(filter);
        match &result {
            Ok(rows) => debug!(
                "event=client_find module=service status=ok rows={} duration_ms={}",
                rows.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=client_find module=service status=error error_code={} duration_ms={}",
                err.code(),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

fn log_outcome<T>(event: &str, client_id: ClientId, result: &RepoResult<T>, started_at: Instant) {
    match result {
        Ok(_) => debug!(
            "event={event} module=service status=ok client_id={client_id} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={event} module=service status=error client_id={client_id} error_code={} duration_ms={}",
            err.code(),
            started_at.elapsed().as_millis()
        ),
    }
}
