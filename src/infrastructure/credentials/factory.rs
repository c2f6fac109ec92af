use serde::Deserialize;
use std::sync::Arc;

use super::{AwsSecretsProvider, EnvSecretProvider};
use crate::domain::SecretProvider;

/// Where database credentials come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecretProviderKind {
    #[default]
    Aws,
    Env,
}

/// Secret provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub provider: SecretProviderKind,
    /// AWS region of the Secrets Manager endpoint
    pub region: String,
    /// Name of the secret holding the database credentials
    pub secret_name: String,
    /// Variable prefix for the `env` provider
    pub env_prefix: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            provider: SecretProviderKind::default(),
            region: "us-east-1".to_string(),
            secret_name: "rds-sheba-assignment".to_string(),
            env_prefix: "DB".to_string(),
        }
    }
}

/// Factory for creating secret providers
#[derive(Debug)]
pub struct SecretProviderFactory;

impl SecretProviderFactory {
    /// Create a secret provider from configuration
    pub async fn create(config: &SecretsConfig) -> Arc<dyn SecretProvider> {
        match config.provider {
            SecretProviderKind::Aws => Arc::new(AwsSecretsProvider::new(&config.region).await),
            SecretProviderKind::Env => Arc::new(EnvSecretProvider::with_prefix(&config.env_prefix)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_config_defaults() {
        let config = SecretsConfig::default();

        assert_eq!(config.provider, SecretProviderKind::Aws);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.secret_name, "rds-sheba-assignment");
    }

    #[test]
    fn test_provider_kind_deserialization() {
        let kind: SecretProviderKind = serde_json::from_str("\"env\"").unwrap();
        assert_eq!(kind, SecretProviderKind::Env);
    }

    #[tokio::test]
    async fn test_create_env_provider() {
        let config = SecretsConfig {
            provider: SecretProviderKind::Env,
            ..Default::default()
        };

        let provider = SecretProviderFactory::create(&config).await;
        assert_eq!(provider.provider_name(), "env");
    }
}
