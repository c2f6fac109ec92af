//! Query string extractor that returns errors in the API error format

use axum::{
    extract::{FromRequestParts, Query as AxumQuery},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::{ApiError, INVALID_INPUT_MESSAGE};

/// Wrapper around `axum::extract::Query` whose rejections are
/// `400 {"error": ...}`, e.g. for a repeated key
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

#[derive(Debug)]
pub struct QueryRejection {
    detail: String,
}

impl IntoResponse for QueryRejection {
    fn into_response(self) -> Response {
        warn!(detail = %self.detail, "Rejected query string");
        ApiError::bad_request(INVALID_INPUT_MESSAGE).into_response()
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(QueryRejection {
                detail: rejection.body_text(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        name: Option<String>,
    }

    async fn extract(uri: &str) -> Result<Query<Params>, QueryRejection> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Query::<Params>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_query_parses() {
        let Query(params) = extract("/x?name=alice").await.unwrap();
        assert_eq!(params.name.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_repeated_key_is_bad_request() {
        let rejection = extract("/x?name=a&name=b").await.unwrap_err();

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
