//! Domain service for the directed follow graph.

use thiserror::Error;

use crate::constants::messages;
use crate::domain::{AuthContext, Identity, UserId};

#[derive(Debug, Error)]
pub enum RelationshipError {
    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,

    /// No identity has the requested username.
    #[error("{}", messages::NOT_FOUND)]
    TargetNotFound,

    #[error("{}", messages::ALREADY_FOLLOWING)]
    AlreadyFollowing,

    #[error("{}", messages::NOT_FOLLOWING)]
    NotFollowing,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RelationshipError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RelationshipError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Targets are named by username; edges are stored by id. A username that
/// does not resolve is reported before any edge state is inspected.
#[async_trait::async_trait]
pub trait RelationshipService: Send + Sync {
    /// Adds `caller -> followee`. Following yourself is allowed.
    ///
    /// # Errors
    ///
    /// - [`RelationshipError::NotAuthenticated`] for an anonymous caller.
    /// - [`RelationshipError::TargetNotFound`] if the username is unknown.
    /// - [`RelationshipError::AlreadyFollowing`] if the edge exists.
    async fn follow(&self, ctx: AuthContext, followee: &str) -> Result<(), RelationshipError>;

    /// Removes `caller -> followee`.
    ///
    /// # Errors
    ///
    /// Same as [`RelationshipService::follow`], with
    /// [`RelationshipError::NotFollowing`] when there is no edge to remove.
    async fn unfollow(&self, ctx: AuthContext, followee: &str) -> Result<(), RelationshipError>;

    /// Whether `follower` currently follows `followee`.
    async fn is_following(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<bool, RelationshipError>;

    /// Everyone `id` follows, ordered by id.
    async fn followees_of(&self, id: UserId) -> Result<Vec<Identity>, RelationshipError>;
}
