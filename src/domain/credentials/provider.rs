use async_trait::async_trait;
use std::fmt::Debug;

use super::DatabaseCredentials;
use crate::domain::DomainError;

/// Trait for secret providers (AWS Secrets Manager, environment)
#[async_trait]
pub trait SecretProvider: Send + Sync + Debug {
    /// Fetch the database credentials stored under `secret_name`
    async fn fetch_credentials(&self, secret_name: &str)
        -> Result<DatabaseCredentials, DomainError>;

    /// Get provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub struct MockSecretProvider {
        secrets: HashMap<String, DatabaseCredentials>,
    }

    impl MockSecretProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_secret(mut self, name: impl Into<String>, creds: DatabaseCredentials) -> Self {
            self.secrets.insert(name.into(), creds);
            self
        }
    }

    #[async_trait]
    impl SecretProvider for MockSecretProvider {
        async fn fetch_credentials(
            &self,
            secret_name: &str,
        ) -> Result<DatabaseCredentials, DomainError> {
            self.secrets.get(secret_name).cloned().ok_or_else(|| {
                DomainError::secret(format!("Secret '{}' not found", secret_name))
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
