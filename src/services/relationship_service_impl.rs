//! `SeaORM` implementation of the `RelationshipService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::{AuthContext, Identity, UserId};
use crate::services::relationship_service::{RelationshipError, RelationshipService};

pub struct SeaOrmRelationshipService {
    store: Store,
}

impl SeaOrmRelationshipService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn resolve_target(&self, username: &str) -> Result<UserId, RelationshipError> {
        self.store
            .get_user_by_username(username)
            .await?
            .map(|identity| identity.id)
            .ok_or(RelationshipError::TargetNotFound)
    }
}

#[async_trait]
impl RelationshipService for SeaOrmRelationshipService {
    async fn follow(&self, ctx: AuthContext, followee: &str) -> Result<(), RelationshipError> {
        let follower = ctx.user_id().ok_or(RelationshipError::NotAuthenticated)?;
        let followee_id = self.resolve_target(followee).await?;

        if !self.store.add_follow(follower, followee_id).await? {
            return Err(RelationshipError::AlreadyFollowing);
        }

        metrics::counter!("chirper_follow_changes_total", "action" => "follow").increment(1);
        info!(%follower, followee = %followee_id, "Follow edge added");

        Ok(())
    }

    async fn unfollow(&self, ctx: AuthContext, followee: &str) -> Result<(), RelationshipError> {
        let follower = ctx.user_id().ok_or(RelationshipError::NotAuthenticated)?;
        let followee_id = self.resolve_target(followee).await?;

        if !self.store.remove_follow(follower, followee_id).await? {
            return Err(RelationshipError::NotFollowing);
        }

        metrics::counter!("chirper_follow_changes_total", "action" => "unfollow").increment(1);
        info!(%follower, followee = %followee_id, "Follow edge removed");

        Ok(())
    }

    async fn is_following(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<bool, RelationshipError> {
        Ok(self.store.is_following(follower, followee).await?)
    }

    async fn followees_of(&self, id: UserId) -> Result<Vec<Identity>, RelationshipError> {
        let ids = self.store.followee_ids(id).await?;
        Ok(self.store.get_users_by_ids(&ids).await?)
    }
}
