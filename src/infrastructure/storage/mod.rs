//! Relational storage bootstrap

mod mysql;

pub use mysql::{validate_table_name, DatabaseConfig, MySqlStore, StorageBackend};
