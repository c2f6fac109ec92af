//! API middleware components

pub mod logging;
pub mod metrics;
pub mod requester_ip;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use requester_ip::RequesterIp;
