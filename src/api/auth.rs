use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::json_body;
use super::{ApiError, AppState, FieldErrors, LoginRequest, LoginResponse};
use crate::constants::{messages, routes, session as session_keys};
use crate::domain::{AuthContext, UserId};
use crate::services::AuthError;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::NotAuthenticated => Self::NotAuthenticated,
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves who is calling and attaches an [`AuthContext`] to the request.
///
/// Checks, in order:
/// 1. Session cookie (from login)
/// 2. `Authorization: Basic` header, when enabled
///
/// A request with neither proceeds as `Anonymous`. Basic credentials that
/// are present but wrong end the request with 403.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = match authenticate_request(&state, &session, request.headers()).await {
        Ok(ctx) => ctx,
        Err(e) => return e.into_response(),
    };

    if let Some(user_id) = ctx.user_id() {
        tracing::Span::current().record("user_id", user_id.value());
    }

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

/// Rejects anonymous callers before the handler runs.
pub async fn require_authenticated(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(AuthContext::is_authenticated);

    if !authenticated {
        return ApiError::NotAuthenticated.into_response();
    }

    next.run(request).await
}

async fn authenticate_request(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<AuthContext, ApiError> {
    if let Some(user_id) = session.get::<i32>(session_keys::USER_KEY).await? {
        let ctx = state
            .auth_service()
            .resolve_session(UserId::new(user_id))
            .await?;

        if ctx.is_authenticated() {
            return Ok(ctx);
        }
    }

    let allow_basic = state.config().read().await.server.allow_basic_auth;

    if allow_basic && let Some((username, password)) = extract_basic_credentials(headers) {
        let identity = state
            .auth_service()
            .authenticate(&username, &password)
            .await
            .map_err(|e| match e {
                AuthError::InvalidCredentials => {
                    ApiError::Forbidden(messages::INVALID_CREDENTIALS.to_string())
                }
                other => other.into(),
            })?;

        return Ok(AuthContext::authenticated(identity.id));
    }

    Ok(AuthContext::Anonymous)
}

/// Decodes `Authorization: Basic base64(username:password)`.
fn extract_basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
/// Verify credentials and bind the identity to a fresh session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload = json_body(payload)?;

    let mut errors = FieldErrors::new();
    let username = errors.required("username", payload.username);
    let password = errors.required("password", payload.password);
    errors.finish()?;

    let identity = state.auth_service().login(&username, &password).await?;

    // New id on privilege change so a pre-login session id is useless afterwards.
    session.cycle_id().await?;
    session
        .insert(session_keys::USER_KEY, identity.id.value())
        .await?;

    Ok(Json(LoginResponse {
        redirect: routes::HOME_PATH.to_string(),
    }))
}

/// POST /logout
/// Drop the current session. Fails with 403 when there is none.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    session: Session,
) -> Result<Json<&'static str>, ApiError> {
    state.auth_service().logout(ctx)?;
    session.flush().await?;

    Ok(Json("OK"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_basic_credentials() {
        let encoded = STANDARD.encode("TestUser:Pass:word");
        let headers = basic(&format!("Basic {encoded}"));

        assert_eq!(
            extract_basic_credentials(&headers),
            Some(("TestUser".to_string(), "Pass:word".to_string()))
        );
    }

    #[test]
    fn test_extract_basic_credentials_ignores_other_schemes() {
        assert_eq!(extract_basic_credentials(&basic("Bearer abc")), None);
        assert_eq!(extract_basic_credentials(&basic("Basic !!!")), None);
        assert_eq!(extract_basic_credentials(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_basic_credentials_requires_separator() {
        let encoded = STANDARD.encode("no-colon");
        assert_eq!(
            extract_basic_credentials(&basic(&format!("Basic {encoded}"))),
            None
        );
    }
}
