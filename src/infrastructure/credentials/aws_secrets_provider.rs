use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use tracing::{error, info};

use crate::domain::{DatabaseCredentials, DomainError, SecretProvider};

/// Trait for AWS Secrets Manager client operations (for mocking)
#[async_trait]
pub trait SecretsManagerClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_secret_value(&self, secret_name: &str) -> Result<String, DomainError>;
}

/// Real AWS Secrets Manager client wrapper
#[derive(Debug)]
pub struct RealSecretsManagerClient {
    client: SecretsManagerClient,
}

impl RealSecretsManagerClient {
    pub fn new(client: SecretsManagerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretsManagerClientTrait for RealSecretsManagerClient {
    async fn get_secret_value(&self, secret_name: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| DomainError::secret(format!("AWS Secrets Manager error: {}", e)))?;

        response
            .secret_string()
            .map(|s| s.to_string())
            .ok_or_else(|| DomainError::secret("Secret does not contain a string value"))
    }
}

/// Secret provider backed by AWS Secrets Manager
#[derive(Debug)]
pub struct AwsSecretsProvider<C: SecretsManagerClientTrait> {
    client: C,
}

impl AwsSecretsProvider<RealSecretsManagerClient> {
    /// Build a client for `region` from the default AWS credential chain
    pub async fn new(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.into()))
            .load()
            .await;
        let client = SecretsManagerClient::new(&config);

        Self {
            client: RealSecretsManagerClient::new(client),
        }
    }
}

impl<C: SecretsManagerClientTrait> AwsSecretsProvider<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    fn parse_secret(&self, secret_string: &str) -> Result<DatabaseCredentials, DomainError> {
        serde_json::from_str(secret_string)
            .map_err(|e| DomainError::secret(format!("Failed to parse secret as JSON: {}", e)))
    }
}

#[async_trait]
impl<C: SecretsManagerClientTrait> SecretProvider for AwsSecretsProvider<C> {
    async fn fetch_credentials(
        &self,
        secret_name: &str,
    ) -> Result<DatabaseCredentials, DomainError> {
        let result = async {
            let secret_string = self.client.get_secret_value(secret_name).await?;
            self.parse_secret(&secret_string)
        }
        .await;

        match &result {
            Ok(_) => info!(secret = %secret_name, "Secret retrieved successfully"),
            Err(e) => error!(secret = %secret_name, error = %e, "Failed to retrieve secret"),
        }

        result
    }

    fn provider_name(&self) -> &'static str {
        "aws_secrets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct MockSecretsClient {
        secrets: HashMap<String, String>,
    }

    impl MockSecretsClient {
        fn new() -> Self {
            Self {
                secrets: HashMap::new(),
            }
        }

        fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.secrets.insert(name.into(), value.into());
            self
        }
    }

    #[async_trait]
    impl SecretsManagerClientTrait for MockSecretsClient {
        async fn get_secret_value(&self, secret_name: &str) -> Result<String, DomainError> {
            self.secrets
                .get(secret_name)
                .cloned()
                .ok_or_else(|| DomainError::secret("Secret not found"))
        }
    }

    #[tokio::test]
    async fn test_aws_secrets_provider() {
        let client = MockSecretsClient::new().with_secret(
            "rds-sheba-assignment",
            r#"{"endpoint": "db.local", "username": "admin", "pwd": "pw",
                "port": 3306, "dbName": "registry"}"#,
        );

        let provider = AwsSecretsProvider::with_client(client);
        let creds = provider
            .fetch_credentials("rds-sheba-assignment")
            .await
            .unwrap();

        assert_eq!(creds.host(), "db.local");
        assert_eq!(creds.port(), 3306);
        assert_eq!(creds.database(), "registry");
        assert_eq!(provider.provider_name(), "aws_secrets");
    }

    #[tokio::test]
    async fn test_aws_secrets_missing_secret() {
        let provider = AwsSecretsProvider::with_client(MockSecretsClient::new());

        let result = provider.fetch_credentials("nonexistent").await;
        assert!(matches!(result, Err(DomainError::Secret { .. })));
    }

    #[tokio::test]
    async fn test_aws_secrets_malformed_secret() {
        let client = MockSecretsClient::new().with_secret("broken", r#"{"endpoint": "db.local"}"#);
        let provider = AwsSecretsProvider::with_client(client);

        let result = provider.fetch_credentials("broken").await;
        assert!(matches!(result, Err(DomainError::Secret { .. })));
    }
}
