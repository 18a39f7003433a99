//! One-shot catalog seeding: runs the full seed query list, then tops
//! up any genre still short of the per-genre target.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use netwood_ingest::pacer::Pacer;
use netwood_ingest::pipeline::Ingestor;
use netwood_ingest::seed;
use netwood_source::youtube::YouTubeClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let api_key = std::env::var("NETWOOD_YOUTUBE_API_KEY")
        .context("NETWOOD_YOUTUBE_API_KEY must be set")?;

    let db_path = std::env::var("NETWOOD_DB").unwrap_or_else(|_| "netwood.db".to_string());
    let pool = netwood_db::connect(&db_path)
        .await
        .context("failed to connect to database")?;
    netwood_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;

    let source = Arc::new(YouTubeClient::new(api_key));
    let ingestor = Ingestor::new(pool, source);
    let pacer = Pacer::new(Duration::from_secs(3));

    let report = seed::run_seed_queries(&ingestor, &pacer)
        .await
        .context("seed run failed")?;
    info!(
        total_saved = report.total_saved,
        failed_queries = report.failed_queries,
        "seed queries complete"
    );
    anyhow::ensure!(report.total_saved > 0, "seeding saved no content");

    let genre_report = seed::seed_genres(&ingestor, &pacer, 15).await;
    for entry in &genre_report {
        info!(
            genre = entry.genre.as_str(),
            existing = entry.existing,
            added = entry.added,
            total = entry.total,
            "genre gap-fill result"
        );
    }

    Ok(())
}
