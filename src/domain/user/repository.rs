//! User record store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{IdBinding, InsertOutcome, UserRecord};
use crate::domain::DomainError;

/// Repository trait for user records
///
/// Implementations run exactly one parameterized statement per call and
/// guarantee `id` uniqueness themselves: an insert that collides with an
/// existing `id` returns `InsertOutcome::DuplicateId` instead of an error.
#[async_trait]
pub trait UserRecordStore: Send + Sync + Debug {
    /// Check if a record with this ID exists
    async fn exists(&self, id: &str) -> Result<bool, DomainError>;

    /// Insert a new record
    async fn insert(&self, record: &UserRecord) -> Result<InsertOutcome, DomainError>;

    /// All `(id, ip)` pairs stored under an exact username
    async fn find_by_username(&self, username: &str) -> Result<Vec<IdBinding>, DomainError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock record store for testing
    #[derive(Debug, Default)]
    pub struct MockUserRecordStore {
        records: Arc<RwLock<Vec<UserRecord>>>,
        should_fail: Arc<RwLock<bool>>,
        calls: AtomicUsize,
    }

    impl MockUserRecordStore {
        /// Create a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed the store with existing records
        pub async fn with_records(self, records: Vec<UserRecord>) -> Self {
            self.records.write().await.extend(records);
            self
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Number of store operations attempted so far
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub async fn records(&self) -> Vec<UserRecord> {
            self.records.read().await.clone()
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock store configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRecordStore for MockUserRecordStore {
        async fn exists(&self, id: &str) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let records = self.records.read().await;
            Ok(records.iter().any(|r| r.id() == id))
        }

        async fn insert(&self, record: &UserRecord) -> Result<InsertOutcome, DomainError> {
            self.check_should_fail().await?;
            let mut records = self.records.write().await;

            if records.iter().any(|r| r.id() == record.id()) {
                return Ok(InsertOutcome::DuplicateId);
            }

            records.push(record.clone());
            Ok(InsertOutcome::Inserted)
        }

        async fn find_by_username(&self, username: &str) -> Result<Vec<IdBinding>, DomainError> {
            self.check_should_fail().await?;
            let records = self.records.read().await;

            Ok(records
                .iter()
                .filter(|r| r.username() == username)
                .map(UserRecord::binding)
                .collect())
        }

        async fn ping(&self) -> Result<(), DomainError> {
            self.check_should_fail().await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_insert_and_find() {
            let store = MockUserRecordStore::new();
            let record = UserRecord::new("alice", "123", "1.2.3.4");

            assert_eq!(store.insert(&record).await.unwrap(), InsertOutcome::Inserted);
            assert!(store.exists("123").await.unwrap());

            let bindings = store.find_by_username("alice").await.unwrap();
            assert_eq!(bindings, vec![record.binding()]);
        }

        #[tokio::test]
        async fn test_duplicate_insert() {
            let store = MockUserRecordStore::new();

            store
                .insert(&UserRecord::new("alice", "123", "1.2.3.4"))
                .await
                .unwrap();

            let outcome = store
                .insert(&UserRecord::new("bob", "123", "5.6.7.8"))
                .await
                .unwrap();

            assert_eq!(outcome, InsertOutcome::DuplicateId);
            assert_eq!(store.records().await.len(), 1);
        }

        #[tokio::test]
        async fn test_should_fail() {
            let store = MockUserRecordStore::new();
            store.set_should_fail(true).await;

            assert!(store.exists("1").await.is_err());
            assert!(store.ping().await.is_err());
            assert_eq!(store.calls(), 2);
        }
    }
}
