//! Credential management domain

mod credential;
mod provider;

pub use credential::DatabaseCredentials;
pub use provider::SecretProvider;

#[cfg(test)]
pub use provider::mock;
