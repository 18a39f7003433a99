//! YouTube Data API v3 client.
//!
//! Uses the search.list and videos.list endpoints:
//! https://developers.google.com/youtube/v3/docs

use std::collections::BTreeMap;

use netwood_core::types::{Thumbnail, ThumbnailSet};
use tracing::debug;

use crate::provider::VideoSource;
use crate::{SearchHit, SourceError, VideoDetails};

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeClient {
    api_key: String,
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, SourceError> {
        let mut all_params = vec![("key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "youtube request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        // Quota and key problems both surface as 403 on this API.
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::Quota);
        }

        if !resp.status().is_success() {
            return Err(SourceError::Provider(format!(
                "youtube returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| SourceError::Provider(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl VideoSource for YouTubeClient {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn search(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<Vec<SearchHit>, SourceError> {
        let max = max_results.min(50).to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("q", query),
            ("maxResults", max.as_str()),
            ("type", "video"),
            ("videoDefinition", "high"),
            ("relevanceLanguage", "en"),
            ("regionCode", "NG"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let data = self.get_json("/search", &params).await?;
        let items = data["items"].as_array().cloned().unwrap_or_default();

        Ok(items.iter().filter_map(parse_search_hit).collect())
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids.join(",");
        let data = self
            .get_json(
                "/videos",
                &[
                    ("part", "snippet,contentDetails,statistics"),
                    ("id", id_list.as_str()),
                ],
            )
            .await?;
        let items = data["items"].as_array().cloned().unwrap_or_default();

        Ok(items.iter().map(parse_video_details).collect())
    }
}

fn parse_search_hit(item: &serde_json::Value) -> Option<SearchHit> {
    let video_id = item["id"]["videoId"].as_str()?;
    Some(SearchHit {
        video_id: video_id.to_string(),
        title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
    })
}

fn parse_video_details(item: &serde_json::Value) -> VideoDetails {
    let snippet = &item["snippet"];
    let stats = &item["statistics"];

    VideoDetails {
        video_id: item["id"].as_str().unwrap_or("").to_string(),
        title: snippet["title"].as_str().unwrap_or("").to_string(),
        description: snippet["description"].as_str().unwrap_or("").to_string(),
        published_at: snippet["publishedAt"]
            .as_str()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc)),
        channel_id: snippet["channelId"].as_str().unwrap_or("").to_string(),
        channel_title: snippet["channelTitle"].as_str().unwrap_or("").to_string(),
        duration: item["contentDetails"]["duration"]
            .as_str()
            .map(|s| s.to_string()),
        view_count: parse_count(&stats["viewCount"]),
        like_count: parse_count(&stats["likeCount"]),
        comment_count: parse_count(&stats["commentCount"]),
        thumbnails: parse_thumbnails(&snippet["thumbnails"]),
    }
}

// Statistics arrive as JSON strings ("viewCount": "12345").
fn parse_count(value: &serde_json::Value) -> i64 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_i64())
        .unwrap_or(0)
}

fn parse_thumbnails(value: &serde_json::Value) -> ThumbnailSet {
    let mut variants = BTreeMap::new();
    if let Some(map) = value.as_object() {
        for (name, thumb) in map {
            if let Some(url) = thumb["url"].as_str() {
                variants.insert(
                    name.clone(),
                    Thumbnail {
                        url: url.to_string(),
                        width: thumb["width"].as_u64().map(|w| w as u32),
                        height: thumb["height"].as_u64().map(|h| h as u32),
                    },
                );
            }
        }
    }
    ThumbnailSet::from_variants(variants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_search_hit_from_json() {
        let json = serde_json::json!({
            "id": { "kind": "youtube#video", "videoId": "abc123" },
            "snippet": { "title": "Nigerian Movie 2024" }
        });

        let hit = parse_search_hit(&json).unwrap();
        assert_eq!(hit.video_id, "abc123");
        assert_eq!(hit.title, "Nigerian Movie 2024");
    }

    #[test]
    fn search_hit_requires_video_id() {
        // Channel/playlist hits carry no videoId and are dropped.
        let json = serde_json::json!({
            "id": { "kind": "youtube#channel", "channelId": "chan9" },
            "snippet": { "title": "Some Channel" }
        });
        assert!(parse_search_hit(&json).is_none());
    }

    #[test]
    fn parse_video_details_from_json() {
        let json = serde_json::json!({
            "id": "abc123",
            "snippet": {
                "title": "Love In Lagos (2023)",
                "description": "Starring John Doe, Jane Smith",
                "publishedAt": "2023-06-15T12:00:00Z",
                "channelId": "chan1",
                "channelTitle": "Nollywood Hub",
                "thumbnails": {
                    "default": { "url": "https://img/d.jpg", "width": 120, "height": 90 },
                    "maxres": { "url": "https://img/m.jpg", "width": 1280, "height": 720 }
                }
            },
            "contentDetails": { "duration": "PT1H30M45S" },
            "statistics": {
                "viewCount": "1500000",
                "likeCount": "32000",
                "commentCount": "410"
            }
        });

        let details = parse_video_details(&json);
        assert_eq!(details.video_id, "abc123");
        assert_eq!(details.title, "Love In Lagos (2023)");
        assert_eq!(details.duration.as_deref(), Some("PT1H30M45S"));
        assert_eq!(details.view_count, 1_500_000);
        assert_eq!(details.like_count, 32_000);
        assert_eq!(details.comment_count, 410);
        assert_eq!(details.published_at.unwrap().timestamp(), 1_686_830_400);
        assert!(details.thumbnails.default.is_some());
        assert!(details.thumbnails.maxres.is_some());
        assert!(details.thumbnails.medium.is_none());
    }

    #[test]
    fn missing_statistics_default_to_zero() {
        let json = serde_json::json!({
            "id": "xyz",
            "snippet": { "title": "No Stats" },
            "statistics": {}
        });

        let details = parse_video_details(&json);
        assert_eq!(details.view_count, 0);
        assert_eq!(details.like_count, 0);
        assert_eq!(details.comment_count, 0);
        assert!(details.duration.is_none());
        assert!(details.thumbnails.is_empty());
    }
}
