//! Create-user command handler

use crate::config::Config;
use crate::db::NewUserProfile;
use crate::services::{IdentityError, Registration};
use crate::state::SharedState;

pub struct CreateUserArgs {
    pub username: String,
    pub password: String,
    pub email: String,
    pub staff: bool,
    pub superuser: bool,
}

pub async fn cmd_create_user(config: Config, args: CreateUserArgs) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let registration = Registration {
        username: args.username,
        password: args.password,
        profile: NewUserProfile {
            email: args.email,
            is_staff: args.staff,
            is_superuser: args.superuser,
            ..NewUserProfile::default()
        },
    };

    match state.identity_service.register(registration).await {
        Ok(identity) => {
            println!("Created user '{}' (id {})", identity.username, identity.id);
            Ok(())
        }
        Err(IdentityError::DuplicateUsername) => {
            anyhow::bail!("A user with that username already exists")
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create user: {e}")),
    }
}
