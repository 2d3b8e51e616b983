use clap::Subcommand;
use socwatch_core::{normalize_username, DEFAULT_PLATFORM};

#[derive(Debug, Subcommand)]
pub enum ProfilesCommands {
    /// List monitored profiles, newest first
    List,
    /// Start monitoring a username
    Add {
        username: String,
        #[arg(long, default_value = DEFAULT_PLATFORM)]
        platform: String,
        /// Collection interval in minutes
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(i32).range(1..))]
        interval: i32,
    },
}

pub(crate) async fn run_profiles(
    pool: &sqlx::PgPool,
    command: ProfilesCommands,
) -> anyhow::Result<()> {
    match command {
        ProfilesCommands::List => {
            let rows = socwatch_db::list_profiles(pool).await?;
            if rows.is_empty() {
                println!("no monitored profiles");
            }
            for row in rows {
                let last = row
                    .last_collected_at
                    .map_or_else(|| "never".to_owned(), |t| t.to_rfc3339());
                println!(
                    "{:<30} {:<10} {:<8} {:<10} every {}m, last {}",
                    row.username,
                    row.platform,
                    if row.active { "active" } else { "paused" },
                    row.status,
                    row.collection_interval_minutes,
                    last
                );
            }
        }
        ProfilesCommands::Add {
            username,
            platform,
            interval,
        } => {
            let username = normalize_username(&username);
            if username.is_empty() {
                anyhow::bail!("username must not be empty");
            }
            let row = socwatch_db::create_profile(
                pool,
                &socwatch_db::NewProfile {
                    username: &username,
                    platform: platform.trim(),
                    collection_interval_minutes: interval,
                },
            )
            .await?;
            println!("added @{} ({})", row.username, row.id);
        }
    }
    Ok(())
}
