//! Timeline command handler

use crate::config::Config;
use crate::services::IdentityError;
use crate::state::SharedState;

pub async fn cmd_timeline(config: Config, username: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let identity = match state.identity_service.find_by_username(username).await {
        Ok(identity) => identity,
        Err(IdentityError::NotFound) => anyhow::bail!("No user named '{username}'"),
        Err(e) => return Err(e.into()),
    };

    let chirps = state
        .feed_service
        .timeline_for(identity.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to compose timeline: {e}"))?;

    if chirps.is_empty() {
        println!("Nothing to show for {username}. Follow someone who chirps!");
        return Ok(());
    }

    let followees = state
        .relationship_service
        .followees_of(identity.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load followees: {e}"))?;

    println!("Home timeline for {} ({} chirps)", username, chirps.len());
    println!("{:-<70}", "");

    for chirp in chirps {
        let author = chirp
            .author
            .and_then(|id| followees.iter().find(|f| f.id == id))
            .map_or("[deleted]", |f| f.username.as_str());

        println!(
            "{}  @{}",
            chirp.time_posted.format("%Y-%m-%d %H:%M:%S"),
            author
        );
        println!("  {}", chirp.text);
    }

    Ok(())
}
