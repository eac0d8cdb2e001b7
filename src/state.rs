use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ChirpService, DefaultFeedService, FeedService, IdentityService,
    RelationshipService, SeaOrmAuthService, SeaOrmChirpService, SeaOrmIdentityService,
    SeaOrmRelationshipService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub identity_service: Arc<dyn IdentityService>,

    pub auth_service: Arc<dyn AuthService>,

    pub relationship_service: Arc<dyn RelationshipService>,

    pub chirp_service: Arc<dyn ChirpService>,

    pub feed_service: Arc<dyn FeedService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires every service around an already-connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let config = Arc::new(RwLock::new(config));

        let identity_service = Arc::new(SeaOrmIdentityService::new(store.clone(), config.clone()))
            as Arc<dyn IdentityService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let relationship_service = Arc::new(SeaOrmRelationshipService::new(store.clone()))
            as Arc<dyn RelationshipService + Send + Sync + 'static>;

        let chirp_service = Arc::new(SeaOrmChirpService::new(store.clone()))
            as Arc<dyn ChirpService + Send + Sync + 'static>;

        // Feed composition only sees the graph and the chirp store through their traits.
        let feed_service = Arc::new(DefaultFeedService::new(
            relationship_service.clone(),
            chirp_service.clone(),
        )) as Arc<dyn FeedService + Send + Sync + 'static>;

        Self {
            config,
            store,
            identity_service,
            auth_service,
            relationship_service,
            chirp_service,
            feed_service,
        }
    }
}
