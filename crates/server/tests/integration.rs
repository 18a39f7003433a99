use std::sync::Arc;

use axum_test::TestServer;
use netwood_core::types::{Classification, ContentKind, Genre, Language, ThumbnailSet};
use netwood_db::repo::content::{self, ContentUpsert};
use netwood_ingest::pipeline::Ingestor;
use netwood_server::routes::build_router;
use netwood_server::state::AppState;
use netwood_source::{SearchHit, SourceError, VideoDetails, VideoSource};
use serde_json::{Value, json};
use sqlx::SqlitePool;

/// Video source that returns the same canned items for every query.
struct CannedSource {
    items: Vec<VideoDetails>,
}

#[async_trait::async_trait]
impl VideoSource for CannedSource {
    fn name(&self) -> &str {
        "canned"
    }

    async fn search(
        &self,
        _query: &str,
        max_results: u32,
        _page_token: Option<&str>,
    ) -> Result<Vec<SearchHit>, SourceError> {
        Ok(self
            .items
            .iter()
            .take(max_results as usize)
            .map(|v| SearchHit {
                video_id: v.video_id.clone(),
                title: v.title.clone(),
            })
            .collect())
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, SourceError> {
        Ok(self
            .items
            .iter()
            .filter(|v| ids.contains(&v.video_id))
            .cloned()
            .collect())
    }
}

/// Create a test server with an in-memory SQLite database.
async fn test_app_with(items: Vec<VideoDetails>) -> (TestServer, SqlitePool) {
    let pool = netwood_db::connect(":memory:").await.unwrap();
    netwood_db::migrate::run(&pool).await.unwrap();

    let ingestor = Arc::new(Ingestor::new(
        pool.clone(),
        Arc::new(CannedSource { items }),
    ));
    let state = AppState {
        db: pool.clone(),
        ingestor,
    };
    (TestServer::new(build_router(state)).unwrap(), pool)
}

async fn test_app() -> (TestServer, SqlitePool) {
    test_app_with(Vec::new()).await
}

fn stored_item(video_id: &str, title: &str, genre: Genre, views: i64) -> ContentUpsert {
    ContentUpsert {
        video_id: video_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        published_ts: chrono::Utc::now().timestamp() - 3600,
        channel_id: "chan".to_string(),
        channel_title: "Channel".to_string(),
        classification: Classification {
            kind: ContentKind::Movie,
            genres: vec![genre],
            language: Language::English,
            series: None,
            part: None,
            seasonal: None,
            cast: Vec::new(),
            director: None,
            production_company: None,
        },
        view_count: views,
        like_count: 0,
        comment_count: 0,
        duration_secs: 5400,
        release_year: Some(2023),
        thumbnails: ThumbnailSet::default(),
    }
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (server, _) = test_app().await;
    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn search_empty_catalog() {
    let (server, _) = test_app().await;
    let resp = server.get("/api/v1/content/search").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn search_filters_by_genre() {
    let (server, pool) = test_app().await;
    content::upsert_content(&pool, &stored_item("c1", "Funny One", Genre::Comedy, 500))
        .await
        .unwrap();
    content::upsert_content(&pool, &stored_item("d1", "Sad One", Genre::Drama, 900))
        .await
        .unwrap();

    let resp = server.get("/api/v1/content/search?genre=comedy").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["results"][0]["video_id"], "c1");
}

#[tokio::test]
async fn search_rejects_unknown_genre() {
    let (server, _) = test_app().await;
    let resp = server.get("/api/v1/content/search?genre=western").await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn category_browse_and_unknown_category() {
    let (server, pool) = test_app().await;
    content::upsert_content(&pool, &stored_item("c1", "Funny One", Genre::Comedy, 500))
        .await
        .unwrap();

    let resp = server.get("/api/v1/content/category/genre/comedy").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["total_count"], 1);

    let resp = server.get("/api/v1/content/category/mood/happy").await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trending_orders_by_views() {
    let (server, pool) = test_app().await;
    content::upsert_content(&pool, &stored_item("a", "First", Genre::Drama, 100))
        .await
        .unwrap();
    content::upsert_content(&pool, &stored_item("b", "Second", Genre::Drama, 900))
        .await
        .unwrap();

    let resp = server.get("/api/v1/content/trending").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["results"][0]["video_id"], "b");
    assert_eq!(body["results"][1]["video_id"], "a");
}

#[tokio::test]
async fn category_counts_endpoint() {
    let (server, pool) = test_app().await;
    content::upsert_content(&pool, &stored_item("c1", "Funny One", Genre::Comedy, 500))
        .await
        .unwrap();

    let resp = server.get("/api/v1/content/categories").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["genres"][0]["value"], "comedy");
    assert_eq!(body["genres"][0]["count"], 1);
    assert_eq!(body["content_types"][0]["value"], "movie");
}

#[tokio::test]
async fn get_by_id_found_and_missing() {
    let (server, pool) = test_app().await;
    content::upsert_content(&pool, &stored_item("c1", "Funny One", Genre::Comedy, 500))
        .await
        .unwrap();

    let resp = server.get("/api/v1/content/c1").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["title"], "Funny One");

    let resp = server.get("/api/v1/content/nope").await;
    resp.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn admin_ingest_stores_and_reports() {
    let items = vec![VideoDetails {
        video_id: "v1".to_string(),
        title: "Hilarious Wedding (2023)".to_string(),
        description: "Starring John Doe, Jane Smith".to_string(),
        published_at: Some(chrono::Utc::now()),
        channel_id: "chan".to_string(),
        channel_title: "Channel".to_string(),
        duration: Some("PT1H30M".to_string()),
        view_count: 1_200_000,
        like_count: 400,
        comment_count: 25,
        thumbnails: ThumbnailSet::default(),
    }];
    let (server, pool) = test_app_with(items).await;

    let resp = server
        .post("/api/v1/admin/ingest")
        .json(&json!({ "query": "nigerian comedy" }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["saved"], 1);
    assert_eq!(body["results"][0]["popularity_tier"], "viral");

    assert_eq!(content::count_all(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn admin_ingest_rejects_blank_query() {
    let (server, _) = test_app().await;
    let resp = server
        .post("/api/v1/admin/ingest")
        .json(&json!({ "query": "   " }))
        .await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
