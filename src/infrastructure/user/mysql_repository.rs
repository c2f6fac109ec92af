//! MySQL user record store implementation

use async_trait::async_trait;
use sqlx::Row;

use crate::domain::user::{IdBinding, InsertOutcome, UserRecord, UserRecordStore};
use crate::domain::DomainError;
use crate::infrastructure::storage::MySqlStore;

/// MySQL implementation of UserRecordStore
///
/// Statements are built once from the validated table name; all values are
/// bound as parameters.
#[derive(Debug, Clone)]
pub struct MySqlUserRecordStore {
    store: MySqlStore,
    exists_sql: String,
    insert_sql: String,
    find_sql: String,
}

impl MySqlUserRecordStore {
    pub fn new(store: MySqlStore) -> Self {
        let table = store.table_name();

        Self {
            exists_sql: format!("SELECT 1 FROM {} WHERE id = ? LIMIT 1", table),
            insert_sql: format!("INSERT INTO {} (username, id, ip) VALUES (?, ?, ?)", table),
            find_sql: format!("SELECT id, ip FROM {} WHERE username = ?", table),
            store,
        }
    }
}

#[async_trait]
impl UserRecordStore for MySqlUserRecordStore {
    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let row = sqlx::query(&self.exists_sql)
            .bind(id)
            .fetch_optional(self.store.pool())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check for ID existence: {}", e)))?;

        Ok(row.is_some())
    }

    async fn insert(&self, record: &UserRecord) -> Result<InsertOutcome, DomainError> {
        let result = sqlx::query(&self.insert_sql)
            .bind(record.username())
            .bind(record.id())
            .bind(record.ip())
            .execute(self.store.pool())
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::DuplicateId),
            Err(e) => Err(DomainError::storage(format!("Failed to create user: {}", e))),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<IdBinding>, DomainError> {
        let rows = sqlx::query(&self.find_sql)
            .bind(username)
            .fetch_all(self.store.pool())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to retrieve IDs: {}", e)))?;

        rows.iter().map(row_to_binding).collect()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(self.store.pool())
            .await
            .map_err(|e| DomainError::storage(format!("Database unreachable: {}", e)))?;

        Ok(())
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn row_to_binding(row: &sqlx::mysql::MySqlRow) -> Result<IdBinding, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Invalid id column: {}", e)))?;
    let ip: String = row
        .try_get("ip")
        .map_err(|e| DomainError::storage(format!("Invalid ip column: {}", e)))?;

    Ok(IdBinding { id, ip })
}
