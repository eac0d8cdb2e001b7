//! The home timeline: read the feed, post a chirp.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::json_body;
use super::{ApiError, AppState, ChirpDto, CreateChirpRequest, FieldErrors};
use crate::domain::AuthContext;
use crate::services::{ChirpError, FeedError};

impl From<ChirpError> for ApiError {
    fn from(err: ChirpError) -> Self {
        match err {
            ChirpError::NotAuthenticated => Self::NotAuthenticated,
            ChirpError::InvalidText(e) => Self::validation("text", e.to_string()),
            ChirpError::Database(msg) => Self::DatabaseError(msg),
            ChirpError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::NotAuthenticated => Self::NotAuthenticated,
            FeedError::Database(msg) => Self::DatabaseError(msg),
            FeedError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/home`
///
/// Chirps by everyone the caller follows, newest first.
pub async fn get_home(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<ChirpDto>>, ApiError> {
    let chirps = state.feed_service().compose_home(ctx).await?;
    Ok(Json(chirps.into_iter().map(ChirpDto::from).collect()))
}

/// `POST /api/home`
///
/// Posts a chirp as the caller. Any `author` or `time_posted` in the body is ignored.
pub async fn post_chirp(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<CreateChirpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChirpDto>), ApiError> {
    let payload = json_body(payload)?;

    let mut errors = FieldErrors::new();
    let text = errors.required("text", payload.text);
    errors.finish()?;

    let chirp = state.chirp_service().post(ctx, text.trim()).await?;

    Ok((StatusCode::CREATED, Json(ChirpDto::from(chirp))))
}
