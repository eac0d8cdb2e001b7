//! `SeaORM` implementation of the `IdentityService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{AuthContext, ChirpId, Identity, IdentityProfile, UserId, Username};
use crate::services::identity_service::{IdentityError, IdentityService, Registration};

pub struct SeaOrmIdentityService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmIdentityService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl IdentityService for SeaOrmIdentityService {
    async fn register(&self, registration: Registration) -> Result<Identity, IdentityError> {
        let username = Username::parse(&registration.username)?;

        if registration.password.is_empty() {
            return Err(IdentityError::BlankPassword);
        }

        let security = self.config.read().await.security.clone();

        let identity = self
            .store
            .create_user(
                &username,
                &registration.password,
                registration.profile,
                &security,
            )
            .await?
            .ok_or(IdentityError::DuplicateUsername)?;

        metrics::counter!("chirper_registrations_total").increment(1);
        info!(user_id = %identity.id, username = %identity.username, "Identity registered");

        Ok(identity)
    }

    async fn find_by_username(&self, username: &str) -> Result<Identity, IdentityError> {
        self.store
            .get_user_by_username(username)
            .await?
            .ok_or(IdentityError::NotFound)
    }

    async fn profile(
        &self,
        ctx: AuthContext,
        username: &str,
    ) -> Result<IdentityProfile, IdentityError> {
        if !ctx.is_authenticated() {
            return Err(IdentityError::NotAuthenticated);
        }

        let identity = self.find_by_username(username).await?;
        let chirp_ids = self.store.chirp_ids_by_author(identity.id).await?;

        Ok(IdentityProfile {
            identity,
            chirp_ids,
        })
    }

    async fn list_profiles(&self, ctx: AuthContext) -> Result<Vec<IdentityProfile>, IdentityError> {
        if !ctx.is_authenticated() {
            return Err(IdentityError::NotAuthenticated);
        }

        let identities = self.store.list_users().await?;

        let mut chirps_by_author: HashMap<UserId, Vec<ChirpId>> = HashMap::new();
        for (author, chirp) in self.store.author_chirp_ids().await? {
            chirps_by_author.entry(author).or_default().push(chirp);
        }

        Ok(identities
            .into_iter()
            .map(|identity| {
                let chirp_ids = chirps_by_author.remove(&identity.id).unwrap_or_default();
                IdentityProfile {
                    identity,
                    chirp_ids,
                }
            })
            .collect())
    }
}
