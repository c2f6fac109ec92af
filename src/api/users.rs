//! Registration and lookup endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::middleware::RequesterIp;
use super::state::AppState;
use super::types::{ApiError, Json, Query};
use crate::domain::DomainError;
use crate::infrastructure::user::CreateUserRequest;

const CREATE_FAILED_MESSAGE: &str = "Failed to create user.";
const LOOKUP_FAILED_MESSAGE: &str = "Failed to retrieve ID.";

/// Body of `POST /createUser`
///
/// Fields are taken as raw JSON so that a number or any other non-string
/// value is rejected the same way as a malformed string.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            username: string_field(body.username),
            id: string_field(body.id),
        }
    }
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GetIdParams {
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetIdResponse {
    pub id: Vec<String>,
}

/// POST /createUser
pub async fn create_user(
    State(state): State<AppState>,
    ip: RequesterIp,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    debug!("Received createUser request");

    state
        .registration_service
        .register(body.into(), ip.as_deref())
        .await
        .map_err(|e| route_error(e, CREATE_FAILED_MESSAGE))?;

    Ok(Json(CreateUserResponse {
        message: "User created successfully.".to_string(),
    }))
}

/// GET /getId?username=
pub async fn get_id(
    State(state): State<AppState>,
    ip: RequesterIp,
    Query(params): Query<GetIdParams>,
) -> Result<Json<GetIdResponse>, ApiError> {
    debug!("Received getId request");

    let ids = state
        .lookup_service
        .lookup(params.username.as_deref(), ip.as_deref())
        .await
        .map_err(|e| route_error(e, LOOKUP_FAILED_MESSAGE))?;

    Ok(Json(GetIdResponse { id: ids }))
}

/// Store failures answer with a message naming the failed operation
fn route_error(err: DomainError, storage_message: &'static str) -> ApiError {
    match err {
        DomainError::Storage { .. } => ApiError::internal(storage_message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> CreateUserBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_fields_pass_through() {
        let request: CreateUserRequest = body(json!({"username": "Alice", "id": "123"})).into();

        assert_eq!(request.username.as_deref(), Some("Alice"));
        assert_eq!(request.id.as_deref(), Some("123"));
    }

    #[test]
    fn test_non_string_fields_become_missing() {
        let request: CreateUserRequest = body(json!({"username": ["a"], "id": 123})).into();

        assert!(request.username.is_none());
        assert!(request.id.is_none());
    }

    #[test]
    fn test_absent_fields() {
        let request: CreateUserRequest = body(json!({})).into();

        assert!(request.username.is_none());
        assert!(request.id.is_none());
    }

    #[test]
    fn test_storage_error_uses_route_message() {
        let err = route_error(DomainError::storage("pool timed out"), CREATE_FAILED_MESSAGE);

        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.text(), CREATE_FAILED_MESSAGE);
    }

    #[test]
    fn test_other_errors_use_domain_mapping() {
        let err = route_error(DomainError::duplicate_id("123"), CREATE_FAILED_MESSAGE);
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);

        let err = route_error(DomainError::IpUnavailable, LOOKUP_FAILED_MESSAGE);
        assert_eq!(err.body.text(), "Failed retrieving the IP.");
    }
}
