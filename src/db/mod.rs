use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{Chirp, ChirpId, ChirpText, Identity, UserId, Username};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{NewUserProfile, VerifiedUser};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` is its own database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn follow_repo(&self) -> repositories::follow::FollowRepository {
        repositories::follow::FollowRepository::new(self.conn.clone())
    }

    fn chirp_repo(&self) -> repositories::chirp::ChirpRepository {
        repositories::chirp::ChirpRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &Username,
        password: &str,
        profile: NewUserProfile,
        config: &SecurityConfig,
    ) -> Result<Option<Identity>> {
        self.user_repo()
            .create(username, password, profile, config)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<Identity>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<Identity>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<Identity>> {
        self.user_repo().get_by_ids(ids).await
    }

    pub async fn list_users(&self) -> Result<Vec<Identity>> {
        self.user_repo().list_all().await
    }

    pub async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<VerifiedUser>> {
        self.user_repo()
            .verify_password(username, password, config)
            .await
    }

    pub async fn update_user_password(
        &self,
        id: UserId,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, config)
            .await
    }

    pub async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<()> {
        self.user_repo().record_login(id, at).await
    }

    // ========== Follows ==========

    pub async fn add_follow(&self, follower: UserId, followee: UserId) -> Result<bool> {
        self.follow_repo().insert(follower, followee).await
    }

    pub async fn remove_follow(&self, follower: UserId, followee: UserId) -> Result<bool> {
        self.follow_repo().delete(follower, followee).await
    }

    pub async fn is_following(&self, follower: UserId, followee: UserId) -> Result<bool> {
        self.follow_repo().exists(follower, followee).await
    }

    pub async fn followee_ids(&self, follower: UserId) -> Result<Vec<UserId>> {
        self.follow_repo().followee_ids(follower).await
    }

    // ========== Chirps ==========

    pub async fn create_chirp(
        &self,
        author: UserId,
        text: ChirpText,
        time_posted: DateTime<Utc>,
    ) -> Result<Chirp> {
        self.chirp_repo().create(author, text, time_posted).await
    }

    pub async fn get_chirp(&self, id: ChirpId) -> Result<Option<Chirp>> {
        self.chirp_repo().get(id).await
    }

    pub async fn chirps_by_authors(&self, authors: &[UserId]) -> Result<Vec<Chirp>> {
        self.chirp_repo().list_by_authors(authors).await
    }

    pub async fn chirp_ids_by_author(&self, author: UserId) -> Result<Vec<ChirpId>> {
        self.chirp_repo().ids_by_author(author).await
    }

    pub async fn author_chirp_ids(&self) -> Result<Vec<(UserId, ChirpId)>> {
        self.chirp_repo().author_chirp_ids().await
    }
}
