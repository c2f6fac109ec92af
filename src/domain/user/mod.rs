//! User record domain
//!
//! Entities, field validation and the store trait for IP-bound
//! username/ID registrations.

mod entity;
mod repository;
mod validation;

pub use entity::{canonical_username, IdBinding, InsertOutcome, UserRecord};
pub use repository::UserRecordStore;
pub use validation::{FieldKind, Rejection, ValidationConfig, Validator};

#[cfg(test)]
pub use repository::mock::MockUserRecordStore;
