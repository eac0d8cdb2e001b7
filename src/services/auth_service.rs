//! Domain service for the session/auth gate.
//!
//! Moves a caller between `Anonymous` and `Authenticated(id)`. The transport
//! layer owns the session storage; this service only decides transitions.

use thiserror::Error;

use crate::constants::messages;
use crate::domain::{AuthContext, Identity, UserId};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username, wrong password and inactive account all look the same.
    #[error("{}", messages::INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials for an interactive login and stamps `last_login`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails, without saying why.
    async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError>;

    /// Verifies credentials presented on a single request (HTTP Basic).
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError>;

    /// Ends the caller's session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when there was no session to end.
    fn logout(&self, ctx: AuthContext) -> Result<AuthContext, AuthError>;

    /// Maps a user id restored from a session to a context. Ids of deleted or
    /// deactivated users degrade to `Anonymous`.
    async fn resolve_session(&self, user_id: UserId) -> Result<AuthContext, AuthError>;
}
