//! Domain service for registering and looking up identities.

use thiserror::Error;

use crate::constants::messages;
use crate::db::NewUserProfile;
use crate::domain::{AuthContext, Identity, IdentityProfile, UsernameError};

/// Errors specific to identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),

    #[error("{}", messages::BLANK_FIELD)]
    BlankPassword,

    #[error("{}", messages::DUPLICATE_USERNAME)]
    DuplicateUsername,

    #[error("{}", messages::NOT_FOUND)]
    NotFound,

    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for IdentityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Everything needed to create an identity.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub profile: NewUserProfile,
}

impl Registration {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            profile: NewUserProfile::default(),
        }
    }
}

/// Domain service trait for the identity store.
#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Creates a new identity. The password is hashed before it is stored.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::InvalidUsername`] if the username breaks the pattern or length rule.
    /// - [`IdentityError::DuplicateUsername`] if the username is taken, including
    ///   when a concurrent registration wins the race.
    async fn register(&self, registration: Registration) -> Result<Identity, IdentityError>;

    /// Looks up an identity by exact (case-sensitive) username.
    async fn find_by_username(&self, username: &str) -> Result<Identity, IdentityError>;

    /// Identity detail with the ids of its chirps.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotAuthenticated`] for an anonymous caller.
    async fn profile(
        &self,
        ctx: AuthContext,
        username: &str,
    ) -> Result<IdentityProfile, IdentityError>;

    /// Every identity with its chirp ids, ordered by id.
    async fn list_profiles(&self, ctx: AuthContext) -> Result<Vec<IdentityProfile>, IdentityError>;
}
