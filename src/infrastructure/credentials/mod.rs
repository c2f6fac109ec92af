//! Secret providers for database credentials

mod aws_secrets_provider;
mod env_provider;
mod factory;

pub use aws_secrets_provider::{
    AwsSecretsProvider, RealSecretsManagerClient, SecretsManagerClientTrait,
};
pub use env_provider::EnvSecretProvider;
pub use factory::{SecretProviderFactory, SecretProviderKind, SecretsConfig};
