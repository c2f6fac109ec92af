use async_trait::async_trait;
use std::env;

use crate::domain::{DatabaseCredentials, DomainError, SecretProvider};

/// Secret provider that reads database credentials from environment variables
///
/// With the default prefix `DB` it reads `DB_HOST`, `DB_PORT`,
/// `DB_USERNAME`, `DB_PASSWORD` and `DB_NAME`. The secret name is only
/// used in error messages.
#[derive(Debug)]
pub struct EnvSecretProvider {
    prefix: String,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self::with_prefix("DB")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var(&self, suffix: &str, secret_name: &str) -> Result<String, DomainError> {
        let name = format!("{}_{}", self.prefix, suffix);

        env::var(&name).map_err(|_| {
            DomainError::secret(format!(
                "Environment variable '{}' not set for secret '{}'",
                name, secret_name
            ))
        })
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn fetch_credentials(
        &self,
        secret_name: &str,
    ) -> Result<DatabaseCredentials, DomainError> {
        let port = self.var("PORT", secret_name)?;
        let port = port.trim().parse::<u16>().map_err(|_| {
            DomainError::secret(format!("Invalid {}_PORT value '{}'", self.prefix, port))
        })?;

        Ok(DatabaseCredentials::new(
            self.var("HOST", secret_name)?,
            port,
            self.var("USERNAME", secret_name)?,
            self.var("PASSWORD", secret_name)?,
            self.var("NAME", secret_name)?,
        ))
    }

    fn provider_name(&self) -> &'static str {
        "env"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_provider_with_set_variables() {
        // SAFETY: Test runs in isolation with a unique prefix
        unsafe {
            env::set_var("TESTREG_HOST", "localhost");
            env::set_var("TESTREG_PORT", "3306");
            env::set_var("TESTREG_USERNAME", "root");
            env::set_var("TESTREG_PASSWORD", "pw");
            env::set_var("TESTREG_NAME", "registry");
        }

        let provider = EnvSecretProvider::with_prefix("TESTREG");
        let creds = provider.fetch_credentials("local").await.unwrap();

        assert_eq!(creds.host(), "localhost");
        assert_eq!(creds.port(), 3306);
        assert_eq!(creds.username(), "root");
        assert_eq!(creds.database(), "registry");

        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("TESTREG_HOST");
            env::remove_var("TESTREG_PORT");
            env::remove_var("TESTREG_USERNAME");
            env::remove_var("TESTREG_PASSWORD");
            env::remove_var("TESTREG_NAME");
        }
    }

    #[tokio::test]
    async fn test_env_provider_missing_variable() {
        let provider = EnvSecretProvider::with_prefix("NONEXISTENT_PREFIX_12345");

        let result = provider.fetch_credentials("local").await;
        assert!(matches!(result, Err(DomainError::Secret { .. })));
    }

    #[tokio::test]
    async fn test_env_provider_invalid_port() {
        // SAFETY: Test runs in isolation with a unique prefix
        unsafe { env::set_var("BADPORT_PORT", "not-a-port") };

        let provider = EnvSecretProvider::with_prefix("BADPORT");
        let err = provider.fetch_credentials("local").await.unwrap_err();
        assert!(err.to_string().contains("BADPORT_PORT"));

        // SAFETY: Test cleanup
        unsafe { env::remove_var("BADPORT_PORT") };
    }
}
