//! Domain service for the append-only chirp store.

use thiserror::Error;

use crate::constants::messages;
use crate::domain::{AuthContext, Chirp, ChirpTextError, UserId};

#[derive(Debug, Error)]
pub enum ChirpError {
    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,

    #[error(transparent)]
    InvalidText(#[from] ChirpTextError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ChirpError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ChirpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ChirpService: Send + Sync {
    /// Posts a chirp as the caller. Author and timestamp are assigned here,
    /// never taken from the request.
    ///
    /// # Errors
    ///
    /// - [`ChirpError::NotAuthenticated`] for an anonymous caller.
    /// - [`ChirpError::InvalidText`] if the text is blank or longer than 140 characters.
    async fn post(&self, ctx: AuthContext, text: &str) -> Result<Chirp, ChirpError>;

    /// All chirps whose author is in `authors`, newest first.
    async fn by_authors(&self, authors: &[UserId]) -> Result<Vec<Chirp>, ChirpError>;
}
