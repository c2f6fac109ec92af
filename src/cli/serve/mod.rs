//! Serve command - runs the HTTP service until a shutdown signal

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::api::create_router;
use crate::config::AppConfig;
use crate::domain::user::UserRecordStore;
use crate::domain::SecretProvider;
use crate::infrastructure::credentials::SecretProviderFactory;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::storage::{MySqlStore, StorageBackend};
use crate::infrastructure::user::{InMemoryUserRecordStore, MySqlUserRecordStore};

/// Run the service
pub async fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    init_logging(&config.logging);

    let storage = build_storage(&config).await?;
    let state = crate::create_app_state(&config, storage.records.clone());
    let metrics = init_metrics(&config.metrics);
    let app = create_router(
        state,
        &config.server,
        metrics.map(|m| (m, &config.metrics)),
    );

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    storage.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Record store chosen by `database.backend`, with the pool to close on exit
struct Storage {
    records: Arc<dyn UserRecordStore>,
    pool: Option<MySqlStore>,
}

impl Storage {
    async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

async fn build_storage(config: &AppConfig) -> anyhow::Result<Storage> {
    info!(backend = ?config.database.backend, "Selecting record store");

    match config.database.backend {
        StorageBackend::Memory => {
            warn!("Using the in-memory record store; records are lost on restart");
            Ok(Storage {
                records: Arc::new(InMemoryUserRecordStore::new()),
                pool: None,
            })
        }
        StorageBackend::Mysql => {
            let provider = SecretProviderFactory::create(&config.secrets).await;
            let pool = open_store(provider.as_ref(), config).await?;
            pool.warn_if_id_not_unique().await;

            Ok(Storage {
                records: Arc::new(MySqlUserRecordStore::new(pool.clone())),
                pool: Some(pool),
            })
        }
    }
}

/// Fetch credentials and build the connection pool. Failure is fatal.
async fn open_store(
    provider: &dyn SecretProvider,
    config: &AppConfig,
) -> anyhow::Result<MySqlStore> {
    info!(
        provider = provider.provider_name(),
        secret = %config.secrets.secret_name,
        "Fetching database credentials"
    );
    let credentials = provider
        .fetch_credentials(&config.secrets.secret_name)
        .await
        .inspect_err(|e| error!(error = %e, "Cannot start without database credentials"))?;

    let store = MySqlStore::connect(&config.database, &credentials)?;
    if config.database.create_table {
        store.ensure_table().await?;
    }

    Ok(store)
}

/// Load and validate configuration, then print it
pub fn check_config() -> anyhow::Result<()> {
    let config = load_config()?;
    println!("{:#?}", config);
    Ok(())
}

fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("invalid server.host '{}'", config.server.host))?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::mock::MockSecretProvider;
    use crate::domain::DatabaseCredentials;

    fn credentials() -> DatabaseCredentials {
        DatabaseCredentials::new("db.internal", 3306, "admin", "hunter2", "registry")
    }

    #[tokio::test]
    async fn test_open_store_with_secret() {
        let config = AppConfig::default();
        let provider =
            MockSecretProvider::new().with_secret(&config.secrets.secret_name, credentials());

        let store = open_store(&provider, &config).await.unwrap();
        assert_eq!(store.table_name(), "afikusers");
    }

    #[tokio::test]
    async fn test_memory_backend_needs_no_database() {
        let mut config = AppConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.secrets.secret_name = "never-fetched".to_string();

        let storage = build_storage(&config).await.unwrap();
        assert!(storage.pool.is_none());

        let record = crate::domain::UserRecord::new("alice", "1", "1.2.3.4");
        storage.records.insert(&record).await.unwrap();
        assert!(storage.records.exists("1").await.unwrap());

        storage.close().await;
    }

    #[tokio::test]
    async fn test_open_store_missing_secret_is_fatal() {
        let config = AppConfig::default();
        let provider = MockSecretProvider::new().with_secret("other-secret", credentials());

        let err = open_store(&provider, &config).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_build_socket_addr() {
        let config = AppConfig::default();
        let addr = build_socket_addr(&config).unwrap();

        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_build_socket_addr_rejects_hostname() {
        let mut config = AppConfig::default();
        config.server.host = "localhost".to_string();

        assert!(build_socket_addr(&config).is_err());
    }
}
