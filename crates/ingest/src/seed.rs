//! Batch workflows built on the ingestion pipeline: first-run catalog
//! seeding, per-genre gap filling, and the daily metric refresh.

use std::time::Duration;

use netwood_core::types::Genre;
use netwood_db::repo::content::count_by_genre;
use tracing::{error, info, warn};

use crate::pacer::{Clock, Pacer};
use crate::pipeline::{IngestError, Ingestor};

/// Queries for populating an empty catalog.
pub const SEED_QUERIES: &[&str] = &[
    // English Nollywood
    "Nigerian movies 2023",
    "Nigerian movies 2024",
    "Nollywood latest movies",
    "Nollywood full movies",
    "Nigerian TV shows",
    "Nigerian comedy movies",
    "Nigerian drama movies",
    "Nigerian action movies",
    "Nigerian romance movies",
    "Nigerian thriller movies",
    "Nollywood blockbuster movies",
    // French Nollywood
    "Nollywood french movies",
    "Film nigérian en français",
    "Film Nollywood français",
    "Nollywood VF",
    "Film africain français complet",
    "Nigerian movie french",
];

/// Queries for the daily metric refresh.
pub const REFRESH_QUERIES: &[&str] = &[
    "Nigerian movies",
    "Nollywood movies",
    "Nigerian TV shows",
    "Nigerian series",
    "Yoruba movies",
    "Igbo movies",
    "Hausa movies",
    "Nigerian comedy movies",
    "Nigerian drama movies",
    "Nigerian action movies",
    "Nigerian romance movies",
];

/// Extra cool-down after a failed query before trying the next one.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Consecutive failures after which a seed run gives up (a bad key or
/// exhausted quota fails every query, no point burning through the
/// rest).
const MAX_FAILED_QUERIES: usize = 3;

pub const BATCH_SIZE: u32 = 50;

#[derive(Debug, serde::Serialize)]
pub struct GenreSeedEntry {
    pub genre: Genre,
    pub existing: i64,
    pub added: usize,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Top up each genre in the fixed table to `target_per_genre` items.
///
/// Per genre: count what is already stored, and when short, ask the
/// pipeline for 1.5x the shortfall (rounded up) with a genre-targeted
/// query, since the broad query returns off-genre matches too. Only
/// results whose classified genre set actually contains the target
/// genre count as added. A failure for one genre is recorded in its
/// entry and the remaining genres still run.
pub async fn seed_genres<C: Clock>(
    ingestor: &Ingestor,
    pacer: &Pacer<C>,
    target_per_genre: i64,
) -> Vec<GenreSeedEntry> {
    info!(target_per_genre, "genre gap-fill run");

    let mut report = Vec::with_capacity(Genre::ALL.len());
    for genre in Genre::ALL {
        match seed_one_genre(ingestor, pacer, genre, target_per_genre).await {
            Ok(entry) => report.push(entry),
            Err(e) => {
                error!(genre = genre.as_str(), error = %e, "genre seeding failed");
                pacer.back_off(ERROR_BACKOFF).await;
                report.push(GenreSeedEntry {
                    genre,
                    existing: 0,
                    added: 0,
                    total: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }
    report
}

async fn seed_one_genre<C: Clock>(
    ingestor: &Ingestor,
    pacer: &Pacer<C>,
    genre: Genre,
    target: i64,
) -> Result<GenreSeedEntry, IngestError> {
    let existing = count_by_genre(ingestor.pool(), genre).await?;
    if existing >= target {
        info!(genre = genre.as_str(), existing, "target already met");
        return Ok(GenreSeedEntry {
            genre,
            existing,
            added: 0,
            total: existing,
            error: None,
        });
    }

    let needed = target - existing;
    // ceil(needed * 1.5) in integer arithmetic, capped at what a single
    // source request can carry.
    let fetch_limit = u32::try_from((needed * 3 + 1) / 2).unwrap_or(u32::MAX);
    info!(genre = genre.as_str(), existing, needed, fetch_limit, "filling genre gap");

    pacer.pace().await;
    let saved = ingestor
        .ingest(&format!("Nigerian {} movies", genre.as_str()), fetch_limit)
        .await?;

    let added = saved
        .iter()
        .filter(|record| record.genres.contains(&genre))
        .count();

    Ok(GenreSeedEntry {
        genre,
        existing,
        added,
        total: existing + added as i64,
        error: None,
    })
}

#[derive(Debug, serde::Serialize)]
pub struct SeedRunReport {
    pub total_saved: usize,
    pub failed_queries: usize,
}

/// Run the full first-time seed query list, paced between queries.
///
/// Individual query failures are tolerated up to [`MAX_FAILED_QUERIES`];
/// past that the run aborts with the last error.
pub async fn run_seed_queries<C: Clock>(
    ingestor: &Ingestor,
    pacer: &Pacer<C>,
) -> Result<SeedRunReport, IngestError> {
    let mut total_saved = 0;
    let mut failed_queries = 0;

    for query in SEED_QUERIES {
        pacer.pace().await;
        match ingestor.ingest(query, BATCH_SIZE).await {
            Ok(saved) => {
                if saved.is_empty() {
                    warn!(query, "no content saved for seed query");
                } else {
                    total_saved += saved.len();
                }
            }
            Err(e) => {
                failed_queries += 1;
                error!(query, error = %e, "seed query failed");
                if failed_queries >= MAX_FAILED_QUERIES {
                    error!("too many failed seed queries, aborting run");
                    return Err(e);
                }
                pacer.back_off(ERROR_BACKOFF).await;
            }
        }
    }

    info!(total_saved, failed_queries, "seed run complete");
    Ok(SeedRunReport {
        total_saved,
        failed_queries,
    })
}

/// Re-ingest the refresh query list to pull current view/like/comment
/// counts into stored records. Query failures are logged and skipped.
pub async fn run_refresh<C: Clock>(ingestor: &Ingestor, pacer: &Pacer<C>) -> usize {
    let mut total_updated = 0;

    for query in REFRESH_QUERIES {
        pacer.pace().await;
        match ingestor.ingest(query, BATCH_SIZE).await {
            Ok(saved) => total_updated += saved.len(),
            Err(e) => {
                error!(query, error = %e, "refresh query failed");
                pacer.back_off(ERROR_BACKOFF).await;
            }
        }
    }

    info!(total_updated, "daily refresh complete");
    total_updated
}
