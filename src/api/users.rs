//! Registration and identity lookup endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::json_body;
use super::{ApiError, AppState, FieldErrors, RegisterRequest, UserDto};
use crate::domain::{AuthContext, Username};
use crate::services::{IdentityError, Registration};

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidUsername(e) => Self::validation("username", e.to_string()),
            IdentityError::DuplicateUsername => Self::validation("username", err.to_string()),
            IdentityError::BlankPassword => Self::validation("password", err.to_string()),
            IdentityError::NotFound => Self::not_found(),
            IdentityError::NotAuthenticated => Self::NotAuthenticated,
            IdentityError::Database(msg) => Self::DatabaseError(msg),
            IdentityError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `POST /api/register`
///
/// Creates an identity. Responds 201 with the public view of the new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let payload = json_body(payload)?;

    let mut errors = FieldErrors::new();
    let username = errors.non_blank("username", payload.username);
    let password = errors.non_blank("password", payload.password);
    if errors.get("username").is_none()
        && let Err(e) = Username::parse(username.trim())
    {
        errors.add("username", e.to_string());
    }
    errors.finish()?;

    let identity = state
        .identity_service()
        .register(Registration::new(username.trim(), password))
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(identity))))
}

/// `GET /api/users`
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let profiles = state.identity_service().list_profiles(ctx).await?;
    Ok(Json(profiles.into_iter().map(UserDto::from).collect()))
}

/// `GET /api/users/{username}`
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(username): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let profile = state.identity_service().profile(ctx, &username).await?;
    Ok(Json(UserDto::from(profile)))
}
