mod api;
mod middleware;

use std::sync::Arc;

use socwatch_collector::{Collector, CollectorOptions, PgStore};
use socwatch_scraper::ApifyClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = socwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting socwatch-server");

    let pool_config = socwatch_db::PoolConfig::from_app_config(&config);
    let pool = socwatch_db::connect_pool(&config.database_url, pool_config).await?;
    socwatch_db::run_migrations(&pool).await?;

    let scraper = ApifyClient::with_base_url(
        config.scraper_timeout_secs,
        &config.scraper_user_agent,
        &config.apify_base_url,
    )?;
    let collector = Collector::new(
        PgStore::new(pool.clone()),
        scraper,
        CollectorOptions {
            results_limit: config.scraper_results_limit,
            fallback_api_key: config.apify_api_key.clone(),
        },
    );

    let app = build_app(AppState {
        pool,
        collector: Arc::new(collector),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
