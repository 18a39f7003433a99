//! Search → detail-fetch → classify → upsert.

use std::sync::Arc;

use netwood_db::repo::content::{ContentRecord, ContentUpsert, MIN_DURATION_SECS, upsert_content};
use netwood_source::{SourceError, VideoDetails, VideoSource};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::classify;
use crate::duration::parse_duration;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("upstream source error: {0}")]
    Upstream(#[from] SourceError),
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Runs the ingestion pipeline against one video source and one catalog
/// database.
pub struct Ingestor {
    pool: SqlitePool,
    source: Arc<dyn VideoSource>,
}

impl Ingestor {
    pub fn new(pool: SqlitePool, source: Arc<dyn VideoSource>) -> Self {
        Self { pool, source }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetch up to `max_results` matches for `query`, classify them, and
    /// upsert each by external video id.
    ///
    /// Search and detail-fetch failures propagate; a save failure for one
    /// item is logged and that item skipped. Returns the stored records,
    /// so the list may be shorter than the search result (short-form and
    /// failed saves drop out).
    pub async fn ingest(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ContentRecord>, IngestError> {
        info!(source = self.source.name(), query, max_results, "ingest run");

        let hits = self.source.search(query, max_results, None).await?;
        if hits.is_empty() {
            warn!(query, "search returned no results");
            return Ok(Vec::new());
        }

        let ids: Vec<String> = hits.into_iter().map(|h| h.video_id).collect();
        let details = self.source.video_details(&ids).await?;
        if details.is_empty() {
            warn!(query, "no details for any search result");
            return Ok(Vec::new());
        }

        let mut stored = Vec::new();
        for video in &details {
            let duration_secs = parse_duration(video.duration.as_deref());
            if i64::from(duration_secs) < MIN_DURATION_SECS {
                debug!(
                    video_id = %video.video_id,
                    duration_secs,
                    "skipping short-form item"
                );
                continue;
            }

            let item = build_upsert(video, duration_secs);
            match upsert_content(&self.pool, &item).await {
                Ok(record) => stored.push(record),
                Err(e) => {
                    warn!(video_id = %video.video_id, error = %e, "save failed, item skipped");
                }
            }
        }

        info!(query, stored = stored.len(), "ingest run complete");
        Ok(stored)
    }
}

fn build_upsert(video: &VideoDetails, duration_secs: u32) -> ContentUpsert {
    let classification = classify::categorize(&video.title, &video.description);

    // Release year: explicit "(YYYY)" in the title wins, then the
    // publish year.
    let release_year = classify::title_year(&video.title)
        .or_else(|| video.published_at.map(|ts| chrono::Datelike::year(&ts)));

    ContentUpsert {
        video_id: video.video_id.clone(),
        title: video.title.clone(),
        description: video.description.clone(),
        published_ts: video.published_at.map(|ts| ts.timestamp()).unwrap_or(0),
        channel_id: video.channel_id.clone(),
        channel_title: video.channel_title.clone(),
        classification,
        view_count: video.view_count,
        like_count: video.like_count,
        comment_count: video.comment_count,
        duration_secs: i64::from(duration_secs),
        release_year,
        thumbnails: video.thumbnails.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use netwood_core::types::ThumbnailSet;

    fn details(video_id: &str, title: &str) -> VideoDetails {
        VideoDetails {
            video_id: video_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            published_at: Some(chrono::Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap()),
            channel_id: "chan".to_string(),
            channel_title: "Channel".to_string(),
            duration: Some("PT1H".to_string()),
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            thumbnails: ThumbnailSet::default(),
        }
    }

    #[test]
    fn release_year_prefers_title_marker() {
        let item = build_upsert(&details("v1", "Old Classic (1999)"), 3600);
        assert_eq!(item.release_year, Some(1999));
    }

    #[test]
    fn release_year_falls_back_to_publish_year() {
        let item = build_upsert(&details("v1", "Untitled Feature"), 3600);
        assert_eq!(item.release_year, Some(2021));
    }

    #[test]
    fn build_upsert_classifies_text() {
        let mut video = details("v1", "Lagos Love Part 2");
        video.description = "A romantic comedy. Starring John Doe, Jane Smith".to_string();
        let item = build_upsert(&video, 3600);

        assert_eq!(item.classification.series.as_deref(), Some("Lagos Love"));
        assert_eq!(item.classification.part, Some(2));
        assert_eq!(item.classification.cast, vec!["John Doe", "Jane Smith"]);
    }
}
