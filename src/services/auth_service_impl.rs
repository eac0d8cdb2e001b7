//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::domain::{AuthContext, Identity, UserId};
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let security = self.config.read().await.security.clone();

        let Some(verified) = self
            .store
            .verify_user_password(username, password, &security)
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verified.user.is_active {
            debug!(user_id = %verified.user.id, "Rejected credentials for inactive user");
            return Err(AuthError::InvalidCredentials);
        }

        if verified.needs_rehash && security.auto_migrate_password_hashes {
            // The login itself already succeeded; a failed upgrade is retried next time.
            match self
                .store
                .update_user_password(verified.user.id, password, &security)
                .await
            {
                Ok(()) => info!(user_id = %verified.user.id, "Password hash upgraded"),
                Err(e) => warn!(user_id = %verified.user.id, error = %e, "Password hash upgrade failed"),
            }
        }

        Ok(verified.user)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let mut identity = match self.verify(username, password).await {
            Ok(identity) => identity,
            Err(e) => {
                if matches!(e, AuthError::InvalidCredentials) {
                    metrics::counter!("chirper_logins_total", "outcome" => "failure").increment(1);
                }
                return Err(e);
            }
        };

        let now = Utc::now();
        self.store.record_login(identity.id, now).await?;
        identity.last_login = Some(now);

        metrics::counter!("chirper_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %identity.id, "User logged in");

        Ok(identity)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        self.verify(username, password).await
    }

    fn logout(&self, ctx: AuthContext) -> Result<AuthContext, AuthError> {
        let Some(user_id) = ctx.user_id() else {
            return Err(AuthError::NotAuthenticated);
        };

        info!(%user_id, "User logged out");
        Ok(AuthContext::Anonymous)
    }

    async fn resolve_session(&self, user_id: UserId) -> Result<AuthContext, AuthError> {
        let ctx = match self.store.get_user(user_id).await? {
            Some(identity) if identity.is_active => AuthContext::authenticated(identity.id),
            _ => AuthContext::Anonymous,
        };

        Ok(ctx)
    }
}
