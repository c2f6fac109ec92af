//! Registration and lookup services

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::user::{
    canonical_username, InsertOutcome, UserRecord, UserRecordStore, Validator,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_lookup, record_registration};

/// Request for registering a username/ID pair
///
/// Fields are optional because the request body is untrusted: a missing or
/// non-string value is an invalid input, not a transport error.
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub id: Option<String>,
}

impl CreateUserRequest {
    pub fn new(username: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            id: Some(id.into()),
        }
    }
}

/// Validate → check uniqueness → insert
#[derive(Debug, Clone)]
pub struct RegistrationService {
    store: Arc<dyn UserRecordStore>,
    validator: Validator,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn UserRecordStore>, validator: Validator) -> Self {
        Self { store, validator }
    }

    /// Register a new record bound to `ip`
    pub async fn register(
        &self,
        request: CreateUserRequest,
        ip: Option<&str>,
    ) -> Result<UserRecord, DomainError> {
        let result = self.try_register(request, ip).await;
        record_registration(outcome_label(&result));
        result
    }

    async fn try_register(
        &self,
        request: CreateUserRequest,
        ip: Option<&str>,
    ) -> Result<UserRecord, DomainError> {
        let username = request.username.as_deref();
        let id = request.id.as_deref();

        let (Some(username), Some(id)) = (
            username.filter(|&u| self.validator.validate_username(Some(u))),
            id.filter(|&i| self.validator.validate_id(Some(i))),
        ) else {
            warn!("Rejected registration: invalid input");
            return Err(DomainError::invalid_input("Invalid username or ID"));
        };

        let Some(ip) = ip.filter(|&ip| self.validator.validate_ip(Some(ip))) else {
            error!("Rejected registration: requester IP unavailable");
            return Err(DomainError::IpUnavailable);
        };

        if self.store.exists(id).await.inspect_err(log_store_error)? {
            warn!(id = %id, "Rejected registration: ID already exists");
            return Err(DomainError::duplicate_id(id));
        }

        let record = UserRecord::new(username, id, ip);
        info!(username = %record.username(), "Creating user");

        match self.store.insert(&record).await.inspect_err(log_store_error)? {
            InsertOutcome::Inserted => {
                info!(username = %record.username(), id = %record.id(), "User created");
                Ok(record)
            }
            InsertOutcome::DuplicateId => {
                warn!(id = %id, "Rejected registration: ID registered concurrently");
                Err(DomainError::duplicate_id(id))
            }
        }
    }
}

/// Validate → query → filter by requester IP
#[derive(Debug, Clone)]
pub struct LookupService {
    store: Arc<dyn UserRecordStore>,
    validator: Validator,
}

impl LookupService {
    pub fn new(store: Arc<dyn UserRecordStore>, validator: Validator) -> Self {
        Self { store, validator }
    }

    /// IDs registered under `username` from `ip`
    pub async fn lookup(
        &self,
        username: Option<&str>,
        ip: Option<&str>,
    ) -> Result<Vec<String>, DomainError> {
        let result = self.try_lookup(username, ip).await;
        record_lookup(outcome_label(&result));
        result
    }

    async fn try_lookup(
        &self,
        username: Option<&str>,
        ip: Option<&str>,
    ) -> Result<Vec<String>, DomainError> {
        let username = username.filter(|&u| self.validator.validate_username(Some(u)));
        let Some(username) = username else {
            warn!("Rejected lookup: invalid input");
            return Err(DomainError::invalid_input("Invalid username"));
        };

        let Some(ip) = ip.filter(|&ip| self.validator.validate_ip(Some(ip))) else {
            error!("Rejected lookup: requester IP unavailable");
            return Err(DomainError::IpUnavailable);
        };

        let username = canonical_username(username);
        info!(username = %username, "Retrieving IDs");

        let bindings = self
            .store
            .find_by_username(&username)
            .await
            .inspect_err(log_store_error)?;

        if bindings.is_empty() {
            info!(username = %username, "User not found");
            return Err(DomainError::not_found(format!(
                "No record for username '{}'",
                username
            )));
        }

        let ids: Vec<String> = bindings
            .into_iter()
            .filter(|b| b.ip == ip)
            .map(|b| b.id)
            .collect();

        if ids.is_empty() {
            warn!(username = %username, "Lookup from an IP that registered no ID for this user");
            return Err(DomainError::unauthorized(
                "No ID registered for this username from the requester IP",
            ));
        }

        info!(username = %username, count = ids.len(), "IDs retrieved");
        Ok(ids)
    }
}

fn log_store_error(e: &DomainError) {
    error!(error = %e, "Record store operation failed");
}

fn outcome_label<T>(result: &Result<T, DomainError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    }
}
