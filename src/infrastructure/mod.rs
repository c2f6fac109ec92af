//! Infrastructure layer - Secret providers, storage, services and observability

pub mod credentials;
pub mod logging;
pub mod observability;
pub mod storage;
pub mod user;
