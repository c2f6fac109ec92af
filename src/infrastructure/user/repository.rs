//! In-memory user record store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{IdBinding, InsertOutcome, UserRecord, UserRecordStore};
use crate::domain::DomainError;

/// In-memory implementation of UserRecordStore
#[derive(Debug, Default)]
pub struct InMemoryUserRecordStore {
    /// Records keyed by ID
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
    /// Insertion order, so lookups return rows the way a table scan would
    order: Arc<RwLock<Vec<String>>>,
}

impl InMemoryUserRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial records; later duplicates of an ID are dropped
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        let mut map = HashMap::new();
        let mut order = Vec::new();

        for record in records {
            let id = record.id().to_string();

            if !map.contains_key(&id) {
                order.push(id.clone());
                map.insert(id, record);
            }
        }

        Self {
            records: Arc::new(RwLock::new(map)),
            order: Arc::new(RwLock::new(order)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UserRecordStore for InMemoryUserRecordStore {
    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn insert(&self, record: &UserRecord) -> Result<InsertOutcome, DomainError> {
        let mut records = self.records.write().await;
        let mut order = self.order.write().await;

        if records.contains_key(record.id()) {
            return Ok(InsertOutcome::DuplicateId);
        }

        order.push(record.id().to_string());
        records.insert(record.id().to_string(), record.clone());

        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<IdBinding>, DomainError> {
        let records = self.records.read().await;
        let order = self.order.read().await;

        Ok(order
            .iter()
            .filter_map(|id| records.get(id))
            .filter(|r| r.username() == username)
            .map(UserRecord::binding)
            .collect())
    }
}
