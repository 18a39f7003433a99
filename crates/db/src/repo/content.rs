use netwood_core::types::{
    Classification, ContentKind, Genre, Language, PopularityTier, Seasonal, ThumbnailSet,
};
use sqlx::SqlitePool;

/// Items shorter than this are short-form clips and are excluded from
/// ingestion and trending. Zero means "no duration data" (legacy rows)
/// and is not treated as short-form.
pub const MIN_DURATION_SECS: i64 = 60;

const COLUMNS: &str = "video_id, title, description, published_ts, channel_id, channel_title, \
     content_type, language, series, part, seasonal, director, production_company, \
     genres_json, cast_json, thumbnails_json, view_count, like_count, comment_count, \
     duration_secs, popularity_tier, release_year, created_ts, updated_ts";

/// Raw `content` row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRow {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_ts: i64,
    pub channel_id: String,
    pub channel_title: String,
    pub content_type: String,
    pub language: String,
    pub series: Option<String>,
    pub part: Option<i64>,
    pub seasonal: Option<String>,
    pub director: Option<String>,
    pub production_company: Option<String>,
    pub genres_json: String,
    pub cast_json: String,
    pub thumbnails_json: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub duration_secs: i64,
    pub popularity_tier: String,
    pub release_year: Option<i64>,
    pub created_ts: i64,
    pub updated_ts: i64,
}

/// Typed catalog record returned to callers.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ContentRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_ts: i64,
    pub channel_id: String,
    pub channel_title: String,
    pub kind: ContentKind,
    pub genres: Vec<Genre>,
    pub language: Language,
    pub series: Option<String>,
    pub part: Option<u32>,
    pub seasonal: Option<Seasonal>,
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub production_company: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub duration_secs: i64,
    pub popularity_tier: PopularityTier,
    pub release_year: Option<i32>,
    pub thumbnails: ThumbnailSet,
    pub created_ts: i64,
    pub updated_ts: i64,
}

impl From<ContentRow> for ContentRecord {
    fn from(r: ContentRow) -> Self {
        Self {
            kind: ContentKind::parse(&r.content_type).unwrap_or(ContentKind::Movie),
            genres: serde_json::from_str(&r.genres_json).unwrap_or_default(),
            language: Language::parse(&r.language).unwrap_or_default(),
            seasonal: r.seasonal.as_deref().and_then(Seasonal::parse),
            cast: serde_json::from_str(&r.cast_json).unwrap_or_default(),
            popularity_tier: PopularityTier::parse(&r.popularity_tier)
                .unwrap_or(PopularityTier::Niche),
            thumbnails: serde_json::from_str(&r.thumbnails_json).unwrap_or_default(),
            part: r.part.map(|p| p as u32),
            release_year: r.release_year.map(|y| y as i32),
            video_id: r.video_id,
            title: r.title,
            description: r.description,
            published_ts: r.published_ts,
            channel_id: r.channel_id,
            channel_title: r.channel_title,
            series: r.series,
            director: r.director,
            production_company: r.production_company,
            view_count: r.view_count,
            like_count: r.like_count,
            comment_count: r.comment_count,
            duration_secs: r.duration_secs,
            created_ts: r.created_ts,
            updated_ts: r.updated_ts,
        }
    }
}

/// Everything the ingestion pipeline persists for one item. The
/// popularity tier is intentionally absent: it is derived from the view
/// count inside [`upsert_content`] on every save.
#[derive(Debug, Clone)]
pub struct ContentUpsert {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_ts: i64,
    pub channel_id: String,
    pub channel_title: String,
    pub classification: Classification,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub duration_secs: i64,
    pub release_year: Option<i32>,
    pub thumbnails: ThumbnailSet,
}

/// Insert-or-update keyed by external video id.
///
/// Classification, metrics, thumbnails, and `updated_ts` all refresh on
/// conflict; `created_ts` is preserved for existing rows. The content
/// row and the genre join rows are written in one transaction, so a
/// failed save leaves the previous record and genre set intact. Returns
/// the stored record.
pub async fn upsert_content(
    pool: &SqlitePool,
    item: &ContentUpsert,
) -> Result<ContentRecord, sqlx::Error> {
    let c = &item.classification;
    let tier = PopularityTier::from_view_count(item.view_count);
    let now = chrono::Utc::now().timestamp();

    let genres_json =
        serde_json::to_string(&c.genres).unwrap_or_else(|_| "[]".to_string());
    let cast_json = serde_json::to_string(&c.cast).unwrap_or_else(|_| "[]".to_string());
    let thumbnails_json =
        serde_json::to_string(&item.thumbnails).unwrap_or_else(|_| "{}".to_string());

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO content (video_id, title, description, published_ts, channel_id, \
         channel_title, content_type, language, series, part, seasonal, director, \
         production_company, genres_json, cast_json, thumbnails_json, view_count, \
         like_count, comment_count, duration_secs, popularity_tier, release_year, \
         created_ts, updated_ts) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(video_id) DO UPDATE SET \
         title = excluded.title, \
         description = excluded.description, \
         published_ts = excluded.published_ts, \
         channel_id = excluded.channel_id, \
         channel_title = excluded.channel_title, \
         content_type = excluded.content_type, \
         language = excluded.language, \
         series = excluded.series, \
         part = excluded.part, \
         seasonal = excluded.seasonal, \
         director = excluded.director, \
         production_company = excluded.production_company, \
         genres_json = excluded.genres_json, \
         cast_json = excluded.cast_json, \
         thumbnails_json = excluded.thumbnails_json, \
         view_count = excluded.view_count, \
         like_count = excluded.like_count, \
         comment_count = excluded.comment_count, \
         duration_secs = excluded.duration_secs, \
         popularity_tier = excluded.popularity_tier, \
         release_year = excluded.release_year, \
         updated_ts = excluded.updated_ts",
    )
    .bind(&item.video_id)
    .bind(&item.title)
    .bind(&item.description)
    .bind(item.published_ts)
    .bind(&item.channel_id)
    .bind(&item.channel_title)
    .bind(c.kind.as_str())
    .bind(c.language.as_str())
    .bind(&c.series)
    .bind(c.part.map(|p| p as i64))
    .bind(c.seasonal.map(|s| s.as_str()))
    .bind(&c.director)
    .bind(&c.production_company)
    .bind(&genres_json)
    .bind(&cast_json)
    .bind(&thumbnails_json)
    .bind(item.view_count)
    .bind(item.like_count)
    .bind(item.comment_count)
    .bind(item.duration_secs)
    .bind(tier.as_str())
    .bind(item.release_year)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    // Keep the genre join table in sync with the classified set.
    sqlx::query("DELETE FROM content_genre WHERE video_id = ?")
        .bind(&item.video_id)
        .execute(&mut *tx)
        .await?;
    for genre in &c.genres {
        sqlx::query("INSERT OR IGNORE INTO content_genre (video_id, genre) VALUES (?, ?)")
            .bind(&item.video_id)
            .bind(genre.as_str())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let row: ContentRow =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM content WHERE video_id = ?"))
            .bind(&item.video_id)
            .fetch_one(pool)
            .await?;
    Ok(row.into())
}

pub async fn get_content(
    pool: &SqlitePool,
    video_id: &str,
) -> Result<Option<ContentRecord>, sqlx::Error> {
    let row: Option<ContentRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM content WHERE video_id = ?"))
            .bind(video_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Into::into))
}

/// Number of stored items tagged with a genre.
pub async fn count_by_genre(pool: &SqlitePool, genre: Genre) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM content_genre WHERE genre = ?")
            .bind(genre.as_str())
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// Catalog queries
// ---------------------------------------------------------------------------

/// Filters for catalog search. Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub keyword: Option<String>,
    pub kind: Option<ContentKind>,
    pub genre: Option<Genre>,
    pub language: Option<Language>,
    pub series: Option<String>,
    pub cast: Option<String>,
    pub director: Option<String>,
    pub production_company: Option<String>,
    pub popularity_tier: Option<PopularityTier>,
    pub release_year: Option<i32>,
    pub seasonal: Option<Seasonal>,
}

impl SearchFilters {
    /// Build filters for a single category/value pair, as used by the
    /// category browse endpoint. `None` for an unknown category type or
    /// an unparseable value.
    pub fn for_category(category: &str, value: &str) -> Option<Self> {
        let mut filters = Self::default();
        match category {
            "contentType" => filters.kind = Some(ContentKind::parse(value)?),
            "genre" => filters.genre = Some(Genre::parse(value)?),
            "language" => filters.language = Some(Language::parse(value)?),
            "series" => filters.series = Some(value.to_string()),
            "director" => filters.director = Some(value.to_string()),
            "cast" => filters.cast = Some(value.to_string()),
            "productionCompany" => filters.production_company = Some(value.to_string()),
            "popularityTier" => filters.popularity_tier = Some(PopularityTier::parse(value)?),
            "releaseYear" => filters.release_year = Some(value.parse().ok()?),
            "seasonal" => filters.seasonal = Some(Seasonal::parse(value)?),
            _ => return None,
        }
        Some(filters)
    }

    fn where_clause(&self) -> (String, Vec<String>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(keyword) = &self.keyword {
            clauses.push("(title LIKE ? OR description LIKE ? OR cast_json LIKE ?)".into());
            let pattern = format!("%{keyword}%");
            binds.push(pattern.clone());
            binds.push(pattern.clone());
            binds.push(pattern);
        }
        if let Some(kind) = self.kind {
            clauses.push("content_type = ?".into());
            binds.push(kind.as_str().to_string());
        }
        if let Some(genre) = self.genre {
            clauses.push(
                "EXISTS (SELECT 1 FROM content_genre g \
                 WHERE g.video_id = content.video_id AND g.genre = ?)"
                    .into(),
            );
            binds.push(genre.as_str().to_string());
        }
        if let Some(language) = self.language {
            clauses.push("language = ?".into());
            binds.push(language.as_str().to_string());
        }
        if let Some(series) = &self.series {
            clauses.push("series = ?".into());
            binds.push(series.clone());
        }
        if let Some(cast) = &self.cast {
            clauses.push("cast_json LIKE ?".into());
            binds.push(format!("%{cast}%"));
        }
        if let Some(director) = &self.director {
            clauses.push("director LIKE ?".into());
            binds.push(format!("%{director}%"));
        }
        if let Some(company) = &self.production_company {
            clauses.push("production_company LIKE ?".into());
            binds.push(format!("%{company}%"));
        }
        if let Some(tier) = self.popularity_tier {
            clauses.push("popularity_tier = ?".into());
            binds.push(tier.as_str().to_string());
        }
        if let Some(year) = self.release_year {
            clauses.push("release_year = ?".into());
            binds.push(year.to_string());
        }
        if let Some(seasonal) = self.seasonal {
            clauses.push("seasonal = ?".into());
            binds.push(seasonal.as_str().to_string());
        }

        if clauses.is_empty() {
            ("1 = 1".to_string(), binds)
        } else {
            (clauses.join(" AND "), binds)
        }
    }
}

/// One page of catalog results.
#[derive(Debug, serde::Serialize)]
pub struct Page {
    pub results: Vec<ContentRecord>,
    pub total_count: i64,
    pub total_pages: i64,
}

async fn fetch_page(
    pool: &SqlitePool,
    where_sql: &str,
    binds: &[String],
    limit: i64,
    offset: i64,
) -> Result<Page, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM content WHERE {where_sql} \
         ORDER BY view_count DESC LIMIT ? OFFSET ?"
    );
    let mut query = sqlx::query_as::<_, ContentRow>(&sql);
    for bind in binds {
        query = query.bind(bind);
    }
    let rows = query.bind(limit).bind(offset).fetch_all(pool).await?;

    let count_sql = format!("SELECT COUNT(*) FROM content WHERE {where_sql}");
    let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
    for bind in binds {
        count_query = count_query.bind(bind);
    }
    let (total_count,) = count_query.fetch_one(pool).await?;

    let per_page = limit.max(1);
    Ok(Page {
        results: rows.into_iter().map(Into::into).collect(),
        total_count,
        total_pages: (total_count + per_page - 1) / per_page,
    })
}

/// Filtered catalog search ordered by view count (most popular first).
pub async fn search_content(
    pool: &SqlitePool,
    filters: &SearchFilters,
    limit: i64,
    offset: i64,
) -> Result<Page, sqlx::Error> {
    let (where_sql, binds) = filters.where_clause();
    fetch_page(pool, &where_sql, &binds, limit, offset).await
}

/// Content published in the last 90 days, short-form excluded, most
/// viewed first.
pub async fn trending_content(
    pool: &SqlitePool,
    kind: Option<ContentKind>,
    language: Option<Language>,
    limit: i64,
    offset: i64,
) -> Result<Page, sqlx::Error> {
    let cutoff = chrono::Utc::now().timestamp() - 90 * 86_400;
    let mut where_sql = format!(
        "published_ts >= {cutoff} AND (duration_secs >= {MIN_DURATION_SECS} OR duration_secs = 0)"
    );
    let mut binds = Vec::new();
    if let Some(kind) = kind {
        where_sql.push_str(" AND content_type = ?");
        binds.push(kind.as_str().to_string());
    }
    if let Some(language) = language {
        where_sql.push_str(" AND language = ?");
        binds.push(language.as_str().to_string());
    }
    fetch_page(pool, &where_sql, &binds, limit, offset).await
}

#[derive(Debug, serde::Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: i64,
}

/// Counts for every browsable category dimension.
#[derive(Debug, serde::Serialize)]
pub struct CategoryCounts {
    pub content_types: Vec<CategoryCount>,
    pub genres: Vec<CategoryCount>,
    pub languages: Vec<CategoryCount>,
    pub production_companies: Vec<CategoryCount>,
    pub directors: Vec<CategoryCount>,
    pub cast: Vec<CategoryCount>,
    pub release_years: Vec<CategoryCount>,
}

async fn count_rows(pool: &SqlitePool, sql: &str) -> Result<Vec<CategoryCount>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(sql).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(value, count)| CategoryCount { value, count })
        .collect())
}

pub async fn category_counts(pool: &SqlitePool) -> Result<CategoryCounts, sqlx::Error> {
    Ok(CategoryCounts {
        content_types: count_rows(
            pool,
            "SELECT content_type, COUNT(*) FROM content GROUP BY content_type",
        )
        .await?,
        genres: count_rows(
            pool,
            "SELECT genre, COUNT(*) FROM content_genre GROUP BY genre ORDER BY COUNT(*) DESC",
        )
        .await?,
        languages: count_rows(
            pool,
            "SELECT language, COUNT(*) FROM content GROUP BY language",
        )
        .await?,
        production_companies: count_rows(
            pool,
            "SELECT production_company, COUNT(*) FROM content \
             WHERE production_company IS NOT NULL \
             GROUP BY production_company ORDER BY COUNT(*) DESC LIMIT 20",
        )
        .await?,
        directors: count_rows(
            pool,
            "SELECT director, COUNT(*) FROM content WHERE director IS NOT NULL \
             GROUP BY director ORDER BY COUNT(*) DESC LIMIT 20",
        )
        .await?,
        cast: count_rows(
            pool,
            "SELECT je.value, COUNT(*) FROM content, json_each(content.cast_json) AS je \
             GROUP BY je.value ORDER BY COUNT(*) DESC LIMIT 20",
        )
        .await?,
        release_years: count_rows(
            pool,
            "SELECT CAST(release_year AS TEXT), COUNT(*) FROM content \
             WHERE release_year IS NOT NULL \
             GROUP BY release_year ORDER BY release_year DESC",
        )
        .await?,
    })
}
