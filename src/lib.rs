//! IP-bound ID registry
//!
//! Registers numeric IDs under a username together with the IP of the
//! client that registered them, and hands the IDs back only to requests
//! coming from that same IP.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::user::{UserRecordStore, Validator};
use tracing::info;

/// Build the application state over a record store
pub fn create_app_state(config: &AppConfig, store: Arc<dyn UserRecordStore>) -> AppState {
    info!(
        trust_forwarded_for = config.server.trust_forwarded_for,
        "Initializing services"
    );

    AppState::new(store, Validator::new(config.validation.clone()))
        .with_trust_forwarded_for(config.server.trust_forwarded_for)
}
