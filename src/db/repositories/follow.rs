use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::OnConflict,
};

use crate::domain::UserId;
use crate::entities::follows;

pub struct FollowRepository {
    conn: DatabaseConnection,
}

impl FollowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Adds the edge `follower -> followee`.
    ///
    /// Returns `false` when the edge already existed. The check and the
    /// write are one statement, so concurrent callers cannot both win.
    pub async fn insert(&self, follower: UserId, followee: UserId) -> Result<bool> {
        let edge = follows::ActiveModel {
            follower_id: Set(follower.value()),
            followee_id: Set(followee.value()),
        };

        let inserted = follows::Entity::insert(edge)
            .on_conflict(
                OnConflict::columns([follows::Column::FollowerId, follows::Column::FolloweeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert follow edge")?;

        Ok(inserted > 0)
    }

    /// Removes the edge `follower -> followee`. Returns `false` when there was
    /// nothing to remove.
    pub async fn delete(&self, follower: UserId, followee: UserId) -> Result<bool> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::FollowerId.eq(follower.value()))
            .filter(follows::Column::FolloweeId.eq(followee.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete follow edge")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn exists(&self, follower: UserId, followee: UserId) -> Result<bool> {
        let edge = follows::Entity::find_by_id((follower.value(), followee.value()))
            .one(&self.conn)
            .await
            .context("Failed to query follow edge")?;

        Ok(edge.is_some())
    }

    /// Ids of everyone `follower` follows, in ascending id order.
    pub async fn followee_ids(&self, follower: UserId) -> Result<Vec<UserId>> {
        let ids: Vec<i32> = follows::Entity::find()
            .select_only()
            .column(follows::Column::FolloweeId)
            .filter(follows::Column::FollowerId.eq(follower.value()))
            .order_by_asc(follows::Column::FolloweeId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query followees")?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }
}
