pub mod provider;
pub mod youtube;

use netwood_core::types::ThumbnailSet;
use thiserror::Error;

pub use provider::VideoSource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("quota exhausted")]
    Quota,
    #[error("provider error: {0}")]
    Provider(String),
}

/// One search hit — just enough to request details.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
}

/// Full detail record for one video, as delivered by the platform.
/// The duration stays in its raw wire encoding; the ingest crate parses it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub channel_id: String,
    pub channel_title: String,
    pub duration: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub thumbnails: ThumbnailSet,
}
