use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::{Chirp, ChirpId, ChirpText, UserId};
use crate::entities::chirps;

impl From<chirps::Model> for Chirp {
    fn from(model: chirps::Model) -> Self {
        Self {
            id: ChirpId::new(model.id),
            author: model.author_id.map(UserId::new),
            text: model.text,
            time_posted: model.time_posted,
        }
    }
}

pub struct ChirpRepository {
    conn: DatabaseConnection,
}

impl ChirpRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        author: UserId,
        text: ChirpText,
        time_posted: DateTime<Utc>,
    ) -> Result<Chirp> {
        let active = chirps::ActiveModel {
            author_id: Set(Some(author.value())),
            text: Set(text.into_inner()),
            time_posted: Set(time_posted),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert chirp")?;

        Ok(Chirp::from(model))
    }

    pub async fn get(&self, id: ChirpId) -> Result<Option<Chirp>> {
        let chirp = chirps::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query chirp")?;

        Ok(chirp.map(Chirp::from))
    }

    /// Chirps written by any of `authors`, newest first. Ties on
    /// `time_posted` fall back to descending id.
    pub async fn list_by_authors(&self, authors: &[UserId]) -> Result<Vec<Chirp>> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }

        let chirps = chirps::Entity::find()
            .filter(chirps::Column::AuthorId.is_in(authors.iter().map(UserId::value)))
            .order_by_desc(chirps::Column::TimePosted)
            .order_by_desc(chirps::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query chirps by authors")?;

        Ok(chirps.into_iter().map(Chirp::from).collect())
    }

    /// Ids of chirps written by `author`, in ascending id order.
    pub async fn ids_by_author(&self, author: UserId) -> Result<Vec<ChirpId>> {
        let ids: Vec<i32> = chirps::Entity::find()
            .select_only()
            .column(chirps::Column::Id)
            .filter(chirps::Column::AuthorId.eq(author.value()))
            .order_by_asc(chirps::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query chirp ids")?;

        Ok(ids.into_iter().map(ChirpId::new).collect())
    }

    /// `(author, chirp)` id pairs for every authored chirp, ordered by chirp id.
    pub async fn author_chirp_ids(&self) -> Result<Vec<(UserId, ChirpId)>> {
        let pairs: Vec<(i32, i32)> = chirps::Entity::find()
            .select_only()
            .column(chirps::Column::AuthorId)
            .column(chirps::Column::Id)
            .filter(chirps::Column::AuthorId.is_not_null())
            .order_by_asc(chirps::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query chirp ids by author")?;

        Ok(pairs
            .into_iter()
            .map(|(author, id)| (UserId::new(author), ChirpId::new(id)))
            .collect())
    }
}
