use anyhow::{Context, Result};
use argon2::{
    ARGON2ID_IDENT, Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::{Identity, UserId, Username};
use crate::entities::users;

impl From<users::Model> for Identity {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            date_joined: model.date_joined,
            last_login: model.last_login,
        }
    }
}

/// Optional profile fields and flags supplied at registration.
#[derive(Debug, Clone, Default)]
pub struct NewUserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Result of a successful password check.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    pub user: Identity,
    /// Stored hash was produced with different Argon2 params than configured.
    pub needs_rehash: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new user, hashing the password first.
    ///
    /// Returns `Ok(None)` when the username is already taken. The unique
    /// constraint on `username` decides, so two racing inserts can never
    /// both succeed.
    pub async fn create(
        &self,
        username: &Username,
        password: &str,
        profile: NewUserProfile,
        config: &SecurityConfig,
    ) -> Result<Option<Identity>> {
        let password = password.to_string();
        let config = config.clone();
        // Argon2 is CPU-intensive; keep it off the async workers.
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            username: Set(username.as_str().to_string()),
            password: Set(password_hash),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            email: Set(profile.email),
            is_active: Set(true),
            is_staff: Set(profile.is_staff),
            is_superuser: Set(profile.is_superuser),
            date_joined: Set(Utc::now()),
            last_login: Set(None),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Identity::from(model))),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Identity>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(Identity::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<Identity>> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(Identity::from))
    }

    pub async fn get_by_ids(&self, ids: &[UserId]) -> Result<Vec<Identity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().map(UserId::value)))
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query users by IDs")?;

        Ok(users.into_iter().map(Identity::from).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Identity>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(Identity::from).collect())
    }

    /// Verify password for a user.
    ///
    /// Returns `None` for both an unknown username and a wrong password. An
    /// unknown username still pays for one hash so response timing does not
    /// reveal which case happened.
    pub async fn verify_password(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<VerifiedUser>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let password = password.to_string();
        let config = config.clone();

        let Some(user) = user else {
            task::spawn_blocking(move || hash_password(&password, &config))
                .await
                .context("Password hashing task panicked")??;
            return Ok(None);
        };

        let password_hash = user.password.clone();

        let (is_valid, needs_rehash) = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let is_valid = Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok();

            Ok::<(bool, bool), anyhow::Error>((is_valid, hash_is_outdated(&parsed_hash, &config)))
        })
        .await
        .context("Password verification task panicked")??;

        if !is_valid {
            return Ok(None);
        }

        Ok(Some(VerifiedUser {
            user: Identity::from(user),
            needs_rehash,
        }))
    }

    /// Replace a user's password hash with one built from `config`.
    pub async fn update_password(
        &self,
        id: UserId,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password = Set(new_hash);
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<()> {
        users::Entity::update_many()
            .col_expr(users::Column::LastLogin, sea_orm::sea_query::Expr::value(at))
            .filter(users::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to record last login")?;

        Ok(())
    }
}

fn argon2_for(config: &SecurityConfig) -> Result<Argon2<'static>> {
    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id with the configured params.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2_for(config)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

fn hash_is_outdated(hash: &PasswordHash<'_>, config: &SecurityConfig) -> bool {
    if hash.algorithm != ARGON2ID_IDENT {
        return true;
    }

    Params::try_from(hash).map_or(true, |params| {
        params.m_cost() != config.argon2_memory_cost_kib
            || params.t_cost() != config.argon2_time_cost
            || params.p_cost() != config.argon2_parallelism
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            auto_migrate_password_hashes: true,
        }
    }

    #[test]
    fn hash_is_phc_argon2id_and_never_plaintext() {
        let hash = hash_password("Password", &cheap_config()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("Password"));
    }

    #[test]
    fn hash_verifies_with_default_verifier() {
        let hash = hash_password("Password", &cheap_config()).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"Password", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"Wrong", &parsed).is_err());
    }

    #[test]
    fn outdated_params_are_detected() {
        let config = cheap_config();
        let hash = hash_password("Password", &config).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(!hash_is_outdated(&parsed, &config));

        let stronger = SecurityConfig {
            argon2_time_cost: 2,
            ..config
        };
        assert!(hash_is_outdated(&parsed, &stronger));
    }
}
