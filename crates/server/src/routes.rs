use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use netwood_core::error::ApiError;
use netwood_core::types::{ContentKind, Genre, Language, PopularityTier, Seasonal};
use netwood_db::repo::content::{
    self, CategoryCounts, ContentRecord, Page, SearchFilters,
};
use netwood_ingest::pacer::Pacer;
use netwood_ingest::seed;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Gap between external calls in paced admin workflows.
const PACE_INTERVAL: Duration = Duration::from_secs(3);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/content/search", get(search_catalog))
        .route("/content/trending", get(trending))
        .route("/content/categories", get(category_counts))
        .route("/content/category/{category}/{value}", get(browse_category))
        .route("/content/{video_id}", get(get_by_id))
        .route("/admin/ingest", post(admin_ingest))
        .route("/admin/seed-genres", post(admin_seed_genres))
        .route("/admin/refresh", post(admin_refresh))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct SearchParams {
    keyword: Option<String>,
    content_type: Option<String>,
    genre: Option<String>,
    language: Option<String>,
    series: Option<String>,
    cast: Option<String>,
    director: Option<String>,
    production_company: Option<String>,
    popularity_tier: Option<String>,
    release_year: Option<String>,
    seasonal: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn paging(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(20).clamp(1, 100);
    let page = page.unwrap_or(1).max(1);
    (limit, (page - 1) * limit)
}

/// Empty query-string values mean "not filtered".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_filter<T>(
    value: Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, AppError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid {field}: {raw}")).into()),
    }
}

impl SearchParams {
    fn into_filters(self) -> Result<SearchFilters, AppError> {
        Ok(SearchFilters {
            keyword: non_blank(self.keyword),
            kind: parse_filter(self.content_type, "contentType", ContentKind::parse)?,
            genre: parse_filter(self.genre, "genre", Genre::parse)?,
            language: parse_filter(self.language, "language", Language::parse)?,
            series: non_blank(self.series),
            cast: non_blank(self.cast),
            director: non_blank(self.director),
            production_company: non_blank(self.production_company),
            popularity_tier: parse_filter(
                self.popularity_tier,
                "popularityTier",
                PopularityTier::parse,
            )?,
            release_year: parse_filter(self.release_year, "releaseYear", |v| v.parse().ok())?,
            seasonal: parse_filter(self.seasonal, "seasonal", Seasonal::parse)?,
        })
    }
}

async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page>, AppError> {
    let (limit, offset) = paging(params.page, params.limit);
    let filters = params.into_filters()?;
    let page = content::search_content(&state.db, &filters, limit, offset).await?;
    Ok(Json(page))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TrendingParams {
    content_type: Option<String>,
    language: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<Page>, AppError> {
    let (limit, offset) = paging(params.page, params.limit);
    let kind = parse_filter(params.content_type, "contentType", ContentKind::parse)?;
    let language = parse_filter(params.language, "language", Language::parse)?;
    let page = content::trending_content(&state.db, kind, language, limit, offset).await?;
    Ok(Json(page))
}

async fn category_counts(
    State(state): State<AppState>,
) -> Result<Json<CategoryCounts>, AppError> {
    Ok(Json(content::category_counts(&state.db).await?))
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PageParams {
    page: Option<i64>,
    limit: Option<i64>,
}

async fn browse_category(
    State(state): State<AppState>,
    Path((category, value)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page>, AppError> {
    let filters = SearchFilters::for_category(&category, &value).ok_or_else(|| {
        ApiError::BadRequest(format!("unknown category filter: {category}={value}"))
    })?;
    let (limit, offset) = paging(params.page, params.limit);
    let page = content::search_content(&state.db, &filters, limit, offset).await?;
    Ok(Json(page))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<ContentRecord>, AppError> {
    content::get_content(&state.db, &video_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no content with id {video_id}")).into())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestRequest {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

fn default_max_results() -> u32 {
    seed::BATCH_SIZE
}

async fn admin_ingest(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()).into());
    }
    let saved = state.ingestor.ingest(&req.query, req.max_results).await?;
    Ok(Json(serde_json::json!({
        "saved": saved.len(),
        "results": saved,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedGenresRequest {
    #[serde(default = "default_target_per_genre")]
    target_per_genre: i64,
}

fn default_target_per_genre() -> i64 {
    15
}

async fn admin_seed_genres(
    State(state): State<AppState>,
    Json(req): Json<SeedGenresRequest>,
) -> Result<Json<Vec<seed::GenreSeedEntry>>, AppError> {
    if req.target_per_genre <= 0 {
        return Err(
            ApiError::BadRequest("targetPerGenre must be positive".to_string()).into(),
        );
    }
    let pacer = Pacer::new(PACE_INTERVAL);
    let report = seed::seed_genres(&state.ingestor, &pacer, req.target_per_genre).await;
    Ok(Json(report))
}

async fn admin_refresh(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pacer = Pacer::new(PACE_INTERVAL);
    let updated = seed::run_refresh(&state.ingestor, &pacer).await;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
