//! User record infrastructure module
//!
//! Store implementations (MySQL, in-memory) and the registration and
//! lookup services built on top of them.

mod mysql_repository;
mod repository;
mod service;

pub use mysql_repository::MySqlUserRecordStore;
pub use repository::InMemoryUserRecordStore;
pub use service::{CreateUserRequest, LookupService, RegistrationService};
