use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::{ErrorBody, FieldErrors};
use crate::constants::messages;

#[derive(Debug)]
pub enum ApiError {
    /// One or more request fields failed validation; rendered as a field map.
    ValidationError(FieldErrors),

    /// The request body could not be read at all.
    BadRequest(String),

    InvalidCredentials,

    NotAuthenticated,

    Forbidden(String),

    NotFound(String),

    /// The request conflicts with current relationship state. Reported as 400.
    Conflict(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(errors) => write!(f, "Validation error: {:?}", errors),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InvalidCredentials => write!(f, "{}", messages::INVALID_CREDENTIALS),
            ApiError::NotAuthenticated => write!(f, "{}", messages::NOT_AUTHENTICATED),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::ValidationError(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                messages::INVALID_CREDENTIALS.to_string(),
            ),
            ApiError::NotAuthenticated => (
                StatusCode::FORBIDDEN,
                messages::NOT_AUTHENTICATED.to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ApiError::InternalError(format!("Session error: {err}"))
    }
}

impl ApiError {
    pub fn validation(field: &str, msg: impl Into<String>) -> Self {
        ApiError::ValidationError(FieldErrors::single(field, msg))
    }

    pub fn not_found() -> Self {
        ApiError::NotFound(messages::NOT_FOUND.to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (ApiError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (ApiError::NotAuthenticated, StatusCode::FORBIDDEN),
            (ApiError::not_found(), StatusCode::NOT_FOUND),
            (
                ApiError::Conflict(messages::ALREADY_FOLLOWING.into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_detail_body() {
        let (status, body) = render(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"detail": "Invalid username/password."})
        );
    }

    #[tokio::test]
    async fn test_field_errors_body() {
        let (status, body) =
            render(ApiError::validation("username", messages::INVALID_USERNAME)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"username": ["Enter a valid username."]}));
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let (_, body) = render(ApiError::DatabaseError("no such table: users".into())).await;
        assert_eq!(body, serde_json::json!({"detail": "A database error occurred"}));
    }
}
