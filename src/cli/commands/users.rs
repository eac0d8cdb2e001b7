//! List users command handler

use std::collections::HashMap;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users registered.");
        println!();
        println!("Add one with: chirper create-user <username> --password <password>");
        return Ok(());
    }

    let mut chirp_counts: HashMap<_, usize> = HashMap::new();
    for (author, _) in store.author_chirp_ids().await? {
        *chirp_counts.entry(author).or_default() += 1;
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let mut flags = Vec::new();
        if !user.is_active {
            flags.push("inactive");
        }
        if user.is_staff {
            flags.push("staff");
        }
        if user.is_superuser {
            flags.push("superuser");
        }

        let chirps = chirp_counts.get(&user.id).copied().unwrap_or(0);
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!("{:>5}  {}{}", user.id, user.username, flags);
        println!(
            "       Joined: {} | Chirps: {}",
            user.date_joined.format("%Y-%m-%d %H:%M"),
            chirps
        );
    }

    Ok(())
}
