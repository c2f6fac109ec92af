//! Domain layer - Core business logic and entities

pub mod credentials;
pub mod error;
pub mod user;

pub use credentials::{DatabaseCredentials, SecretProvider};
pub use error::DomainError;
pub use user::{IdBinding, InsertOutcome, UserRecord, UserRecordStore, Validator};
