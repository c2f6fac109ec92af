use serde::Deserialize;

use crate::domain::user::ValidationConfig;
use crate::domain::DomainError;
use crate::infrastructure::credentials::SecretsConfig;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::DatabaseConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Take the requester IP from `X-Forwarded-For` (behind a load balancer)
    pub trust_forwarded_for: bool,
    /// Allow browser widgets served from any origin
    pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            trust_forwarded_for: false,
            cors_allow_any_origin: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, then `APP__*` variables.
    /// A bare `PORT` variable overrides the listen port.
    pub fn load() -> Result<Self, config::ConfigError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse::<i64>().ok());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.validation
            .check()
            .map_err(|e| DomainError::configuration(format!("validation: {}", e)))?;
        self.database.check()?;

        if self.secrets.secret_name.trim().is_empty() {
            return Err(DomainError::configuration("secrets.secret_name must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 3000);
        assert!(!config.server.trust_forwarded_for);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.table_name, "afikusers");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.validation.username_max_length, 45);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 8081}, "database": {"table_name": "users"},
                "logging": {"format": "json"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.table_name, "users");
        assert_eq!(config.database.pool_size, 5);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.database.table_name = "users; --".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.validation.id_min_length = 10;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.secrets.secret_name = " ".to_string();
        assert!(config.validate().is_err());
    }
}
