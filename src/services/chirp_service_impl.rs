//! `SeaORM` implementation of the `ChirpService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::db::Store;
use crate::domain::{AuthContext, Chirp, ChirpText, UserId};
use crate::services::chirp_service::{ChirpError, ChirpService};

pub struct SeaOrmChirpService {
    store: Store,
}

impl SeaOrmChirpService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChirpService for SeaOrmChirpService {
    async fn post(&self, ctx: AuthContext, text: &str) -> Result<Chirp, ChirpError> {
        let author = ctx.user_id().ok_or(ChirpError::NotAuthenticated)?;
        let text = ChirpText::parse(text)?;

        let chirp = self.store.create_chirp(author, text, Utc::now()).await?;

        metrics::counter!("chirper_chirps_created_total").increment(1);
        info!(chirp_id = %chirp.id, %author, "Chirp posted");

        Ok(chirp)
    }

    async fn by_authors(&self, authors: &[UserId]) -> Result<Vec<Chirp>, ChirpError> {
        Ok(self.store.chirps_by_authors(authors).await?)
    }
}
