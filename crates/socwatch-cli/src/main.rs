mod collect;
mod profiles;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;
use crate::profiles::ProfilesCommands;

#[derive(Debug, Parser)]
#[command(name = "socwatch-cli")]
#[command(about = "Social profile monitoring command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run one collection pass over monitored profiles
    Collect(CollectArgs),
    /// Manage monitored profiles
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommands,
    },
    /// Manage stored settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Subcommand)]
enum SettingsCommands {
    /// Insert or replace a setting value
    Set {
        key: String,
        value: String,
        #[arg(long)]
        description: Option<String>,
    },
}

async fn connect(config: &socwatch_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = socwatch_db::connect_pool(
        &config.database_url,
        socwatch_db::PoolConfig::from_app_config(config),
    )
    .await?;
    Ok(pool)
}

async fn run_db(config: &socwatch_core::AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        DbCommands::Ping => {
            socwatch_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = socwatch_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
        }
    }
    Ok(())
}

async fn run_settings(
    config: &socwatch_core::AppConfig,
    command: SettingsCommands,
) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        SettingsCommands::Set {
            key,
            value,
            description,
        } => {
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("setting key must not be empty");
            }
            socwatch_db::upsert_setting(&pool, key, Some(value.trim()), description.as_deref())
                .await?;
            println!("setting '{key}' saved");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("socwatch-cli: run with --help to list commands");
        return Ok(());
    };

    let config = socwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => run_db(&config, command).await,
        Commands::Collect(args) => {
            let pool = connect(&config).await?;
            collect::run_collect(pool, &config, &args).await
        }
        Commands::Profiles { command } => {
            let pool = connect(&config).await?;
            profiles::run_profiles(&pool, command).await
        }
        Commands::Settings { command } => run_settings(&config, command).await,
    }
}
