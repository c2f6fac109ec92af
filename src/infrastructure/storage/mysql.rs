//! MySQL connection pool bootstrap

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{info, warn};

use crate::domain::{DatabaseCredentials, DomainError};

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").unwrap());

/// Where user records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Mysql,
    /// Process-local map; records are lost on restart
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// Table holding the user records
    pub table_name: String,
    /// Maximum number of connections in the pool
    pub pool_size: u32,
    /// How long a request waits for a pooled connection, in seconds
    pub acquire_timeout_secs: u64,
    /// Create the table on startup if it is missing
    pub create_table: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            table_name: "afikusers".to_string(),
            pool_size: 5,
            acquire_timeout_secs: 30,
            create_table: false,
        }
    }
}

impl DatabaseConfig {
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Check pool size and that the table name is a plain SQL identifier
    pub fn check(&self) -> Result<(), DomainError> {
        if self.pool_size == 0 {
            return Err(DomainError::configuration("database.pool_size must be at least 1"));
        }

        validate_table_name(&self.table_name)
    }
}

/// The table name is interpolated into statements, so it must never carry
/// anything but identifier characters
pub fn validate_table_name(table_name: &str) -> Result<(), DomainError> {
    if TABLE_NAME_PATTERN.is_match(table_name) {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid table name '{}': expected letters, digits and underscores",
            table_name
        )))
    }
}

/// Owned connection pool with an explicit lifecycle
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    table_name: String,
}

impl MySqlStore {
    /// Build the pool. Connections are opened lazily on first use.
    pub fn connect(
        config: &DatabaseConfig,
        credentials: &DatabaseCredentials,
    ) -> Result<Self, DomainError> {
        config.check()?;

        let options = MySqlConnectOptions::new()
            .host(credentials.host())
            .port(credentials.port())
            .username(credentials.username())
            .password(credentials.password())
            .database(credentials.database());

        info!(
            host = %credentials.host(),
            database = %credentials.database(),
            pool_size = config.pool_size,
            "Creating connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            table_name: config.table_name.clone(),
        })
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Creates the records table if it doesn't exist
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                username VARCHAR(45) NOT NULL,
                id VARCHAR(9) NOT NULL,
                ip VARCHAR(39) NOT NULL,
                UNIQUE KEY uq_id (id),
                KEY idx_username (username)
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        info!(table = %self.table_name, "Ensured records table");
        Ok(())
    }

    /// Log a warning when `id` uniqueness is not enforced by the table
    pub async fn warn_if_id_not_unique(&self) {
        match self.has_unique_id_index().await {
            Ok(true) => info!(table = %self.table_name, "Unique index on id present"),
            Ok(false) => warn!(
                table = %self.table_name,
                "No unique index on id; concurrent registrations of one ID may both succeed"
            ),
            Err(e) => warn!(error = %e, "Could not verify unique index on id"),
        }
    }

    /// Whether the table has a single-column unique index (or primary key)
    /// on `id`. Without one, concurrent registrations of one ID can both
    /// be inserted.
    pub async fn has_unique_id_index(&self) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT INDEX_NAME
            FROM information_schema.STATISTICS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND NON_UNIQUE = 0
            GROUP BY INDEX_NAME
            HAVING COUNT(*) = 1 AND MAX(COLUMN_NAME) = 'id'
            LIMIT 1
            "#,
        )
        .bind(&self.table_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to inspect indexes: {}", e)))?;

        Ok(row.is_some())
    }

    /// Close all pooled connections, waiting for checked-out ones to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Connection pool closed");
    }
}
