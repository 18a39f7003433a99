use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use netwood_ingest::pacer::Pacer;
use netwood_ingest::pipeline::Ingestor;
use netwood_ingest::seed;
use netwood_source::youtube::YouTubeClient;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_path = std::env::var("NETWOOD_DB").unwrap_or_else(|_| "netwood.db".to_string());
    info!(db_path = %db_path, "connecting to database");

    let pool = netwood_db::connect(&db_path)
        .await
        .context("failed to connect to database")?;

    netwood_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;
    info!("migrations complete");

    let api_key = std::env::var("NETWOOD_YOUTUBE_API_KEY")
        .context("NETWOOD_YOUTUBE_API_KEY must be set")?;
    let source = Arc::new(YouTubeClient::new(api_key));
    let ingestor = Arc::new(Ingestor::new(pool.clone(), source));

    // Daily refresh: re-ingest the standing query list so stored view
    // counts and popularity tiers stay current.
    {
        let ingestor = ingestor.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                info!("daily content refresh starting");
                let pacer = Pacer::new(Duration::from_secs(5));
                let updated = seed::run_refresh(&ingestor, &pacer).await;
                if updated == 0 {
                    error!("daily refresh updated no content");
                }
            }
        });
    }

    let app_state = netwood_server::state::AppState {
        db: pool,
        ingestor,
    };
    let app = netwood_server::routes::build_router(app_state);

    let bind_addr = std::env::var("NETWOOD_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
