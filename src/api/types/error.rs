//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const INVALID_INPUT_MESSAGE: &str = "Input invalidation.";
pub const IP_UNAVAILABLE_MESSAGE: &str = "Failed retrieving the IP.";
pub const DUPLICATE_ID_MESSAGE: &str = "ID already exists.";
pub const NOT_FOUND_MESSAGE: &str = "User not found.";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized.";
pub const INTERNAL_MESSAGE: &str = "Internal server error.";

/// Error body: server and input failures carry `error`, lookup
/// misses carry `message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorBody {
    Error { error: String },
    Message { message: String },
}

impl ApiErrorBody {
    pub fn text(&self) -> &str {
        match self {
            Self::Error { error } => error,
            Self::Message { message } => message,
        }
    }
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    /// Error with an `{"error": ...}` body
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody::Error {
                error: message.into(),
            },
        }
    }

    /// Error with a `{"message": ...}` body
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody::Message {
                message: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::error(StatusCode::CONFLICT, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::message(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Domain messages are for logs; callers only see the fixed texts above
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput { .. } => Self::bad_request(INVALID_INPUT_MESSAGE),
            DomainError::IpUnavailable => Self::internal(IP_UNAVAILABLE_MESSAGE),
            DomainError::DuplicateId { .. } => Self::conflict(DUPLICATE_ID_MESSAGE),
            DomainError::NotFound { .. } => Self::not_found(NOT_FOUND_MESSAGE),
            DomainError::Unauthorized { .. } => Self::unauthorized(UNAUTHORIZED_MESSAGE),
            DomainError::Storage { .. }
            | DomainError::Secret { .. }
            | DomainError::Configuration { .. } => Self::internal(INTERNAL_MESSAGE),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.body.text())
    }
}

impl std::error::Error for ApiError {}
