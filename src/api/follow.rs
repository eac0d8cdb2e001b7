use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::json_body;
use super::{ApiError, AppState, FieldErrors, FollowRequest, UnfollowRequest};
use crate::domain::AuthContext;
use crate::services::RelationshipError;

impl From<RelationshipError> for ApiError {
    fn from(err: RelationshipError) -> Self {
        match err {
            RelationshipError::NotAuthenticated => Self::NotAuthenticated,
            RelationshipError::TargetNotFound => Self::not_found(),
            RelationshipError::AlreadyFollowing | RelationshipError::NotFollowing => {
                Self::Conflict(err.to_string())
            }
            RelationshipError::Database(msg) => Self::DatabaseError(msg),
            RelationshipError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `PUT /api/follow`
pub async fn follow_user(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<FollowRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let payload = json_body(payload)?;

    let mut errors = FieldErrors::new();
    let username = errors.required("user_to_follow", payload.user_to_follow);
    errors.finish()?;

    state.relationship_service().follow(ctx, &username).await?;

    Ok(Json("OK"))
}

/// `PUT /api/unfollow`
pub async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<UnfollowRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let payload = json_body(payload)?;

    let mut errors = FieldErrors::new();
    let username = errors.required("user_to_unfollow", payload.user_to_unfollow);
    errors.finish()?;

    state.relationship_service().unfollow(ctx, &username).await?;

    Ok(Json("OK"))
}
