//! Domain service composing an identity's home timeline.

use thiserror::Error;

use crate::constants::messages;
use crate::domain::{AuthContext, Chirp, UserId};
use crate::services::{ChirpError, RelationshipError};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RelationshipError> for FeedError {
    fn from(err: RelationshipError) -> Self {
        match err {
            RelationshipError::NotAuthenticated => Self::NotAuthenticated,
            RelationshipError::Database(msg) => Self::Database(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ChirpError> for FeedError {
    fn from(err: ChirpError) -> Self {
        match err {
            ChirpError::NotAuthenticated => Self::NotAuthenticated,
            ChirpError::Database(msg) => Self::Database(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait FeedService: Send + Sync {
    /// Chirps by everyone the caller follows, newest first. The caller's own
    /// chirps appear only if the caller follows itself.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotAuthenticated`] for an anonymous caller.
    async fn compose_home(&self, ctx: AuthContext) -> Result<Vec<Chirp>, FeedError>;

    /// The timeline `id` would see, without a request context. Used by
    /// administrative tooling.
    async fn timeline_for(&self, id: UserId) -> Result<Vec<Chirp>, FeedError>;
}
