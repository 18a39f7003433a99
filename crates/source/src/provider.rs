use crate::{SearchHit, SourceError, VideoDetails};

/// An external video platform the pipeline can pull from.
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    fn name(&self) -> &str;

    /// Search for videos matching a free-text query, capped at `max_results`.
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<Vec<SearchHit>, SourceError>;

    /// Batched detail fetch for a set of video ids.
    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, SourceError>;
}
