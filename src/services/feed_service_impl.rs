//! Feed composition over the relationship and chirp services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{AuthContext, Chirp, UserId};
use crate::services::feed_service::{FeedError, FeedService};
use crate::services::{ChirpService, RelationshipService};

pub struct DefaultFeedService {
    relationships: Arc<dyn RelationshipService>,
    chirps: Arc<dyn ChirpService>,
}

impl DefaultFeedService {
    #[must_use]
    pub fn new(relationships: Arc<dyn RelationshipService>, chirps: Arc<dyn ChirpService>) -> Self {
        Self {
            relationships,
            chirps,
        }
    }
}

#[async_trait]
impl FeedService for DefaultFeedService {
    async fn compose_home(&self, ctx: AuthContext) -> Result<Vec<Chirp>, FeedError> {
        let id = ctx.user_id().ok_or(FeedError::NotAuthenticated)?;
        self.timeline_for(id).await
    }

    async fn timeline_for(&self, id: UserId) -> Result<Vec<Chirp>, FeedError> {
        let followees: Vec<UserId> = self
            .relationships
            .followees_of(id)
            .await?
            .into_iter()
            .map(|identity| identity.id)
            .collect();

        let chirps = self.chirps.by_authors(&followees).await?;
        debug!(user_id = %id, followees = followees.len(), chirps = chirps.len(), "Home feed composed");

        Ok(chirps)
    }
}
