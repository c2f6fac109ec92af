//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::{UserRecordStore, Validator};
use crate::infrastructure::user::{LookupService, RegistrationService};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<RegistrationService>,
    pub lookup_service: Arc<LookupService>,
    pub store: Arc<dyn UserRecordStore>,
    /// Take the requester IP from `X-Forwarded-For`
    pub trust_forwarded_for: bool,
}

impl AppState {
    /// Wire both services over one store
    pub fn new(store: Arc<dyn UserRecordStore>, validator: Validator) -> Self {
        Self {
            registration_service: Arc::new(RegistrationService::new(
                store.clone(),
                validator.clone(),
            )),
            lookup_service: Arc::new(LookupService::new(store.clone(), validator)),
            store,
            trust_forwarded_for: false,
        }
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}
