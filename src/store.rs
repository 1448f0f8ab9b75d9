//! Persistence for video records.
//!
//! Writes are one upsert statement per record, issued sequentially and
//! without a surrounding transaction: a failure stops the remaining writes
//! but leaves already-written rows committed.
//!
//! On conflict only the counters and the `topics`/`tags` columns are
//! refreshed. `channel`, `title`, `description` and `published_at` keep the
//! values from the first insert.

use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::WriteError;
use crate::models::{StoredVideo, VideoRecord};
use crate::normalize::join_delimited;

const UPSERT_VIDEO: &str = r#"
    INSERT INTO videos (id, channel, title, description, published_at, views, likes, dislikes, comment_count, topics, tags)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        views = excluded.views,
        likes = excluded.likes,
        dislikes = excluded.dislikes,
        comment_count = excluded.comment_count,
        topics = excluded.topics,
        tags = excluded.tags
"#;

/// Upsert every record in order. Returns the number of rows written.
pub async fn persist(pool: &SqlitePool, records: &[VideoRecord]) -> Result<usize, WriteError> {
    for record in records {
        upsert_video(pool, record).await?;
    }
    Ok(records.len())
}

pub async fn upsert_video(pool: &SqlitePool, record: &VideoRecord) -> Result<(), WriteError> {
    sqlx::query(UPSERT_VIDEO)
        .bind(&record.id)
        .bind(&record.channel_title)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.published_at)
        .bind(record.view_count)
        .bind(record.like_count)
        .bind(record.dislike_count)
        .bind(record.comment_count)
        .bind(join_delimited(&record.topics))
        .bind(join_delimited(&record.tags))
        .execute(pool)
        .await
        .map_err(|source| WriteError::Statement {
            id: record.id.clone(),
            source,
        })?;

    debug!(id = %record.id, "upserted video");
    Ok(())
}

// ============ Read-back ============

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PublishedAt,
    Views,
    Likes,
    Dislikes,
    Comments,
    Title,
}

impl SortKey {
    fn column(self) -> &'static str {
        match self {
            SortKey::PublishedAt => "published_at",
            SortKey::Views => "views",
            SortKey::Likes => "likes",
            SortKey::Dislikes => "dislikes",
            SortKey::Comments => "comment_count",
            SortKey::Title => "title",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" | "published_at" | "date" => Ok(SortKey::PublishedAt),
            "views" => Ok(SortKey::Views),
            "likes" => Ok(SortKey::Likes),
            "dislikes" => Ok(SortKey::Dislikes),
            "comments" | "comment_count" => Ok(SortKey::Comments),
            "title" => Ok(SortKey::Title),
            other => Err(format!(
                "unknown sort key '{}': expected published, views, likes, dislikes, comments or title",
                other
            )),
        }
    }
}

/// Filters and ordering for [`fetch_videos`].
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    pub sort: SortKey,
    pub ascending: bool,
    /// Literal substring of the title, ASCII case-insensitive. `%` and `_`
    /// are ordinary characters.
    pub title_contains: Option<String>,
    /// Literal substring of the description, matched like `title_contains`.
    pub description_contains: Option<String>,
    /// Exact membership in the stored topic list.
    pub topic: Option<String>,
    /// Exact membership in the stored tag list.
    pub tag: Option<String>,
    pub limit: Option<i64>,
}

pub async fn fetch_videos(pool: &SqlitePool, query: &VideoQuery) -> Result<Vec<StoredVideo>, sqlx::Error> {
    // Column names come from the SortKey whitelist, never from user input.
    let sql = format!(
        r#"
        SELECT id, channel, title, description, published_at, views, likes, dislikes, comment_count, topics, tags
        FROM videos
        WHERE (? IS NULL OR instr(lower(title), lower(?)) > 0)
          AND (? IS NULL OR instr(lower(description), lower(?)) > 0)
          AND (? IS NULL OR instr(';' || topics || ';', ';' || ? || ';') > 0)
          AND (? IS NULL OR instr(';' || tags || ';', ';' || ? || ';') > 0)
        ORDER BY {} {}, id ASC
        LIMIT ?
        "#,
        query.sort.column(),
        if query.ascending { "ASC" } else { "DESC" }
    );

    let rows = sqlx::query(&sql)
        .bind(&query.title_contains)
        .bind(&query.title_contains)
        .bind(&query.description_contains)
        .bind(&query.description_contains)
        .bind(&query.topic)
        .bind(&query.topic)
        .bind(&query.tag)
        .bind(&query.tag)
        .bind(query.limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| StoredVideo {
            id: row.get("id"),
            channel: row.get("channel"),
            title: row.get("title"),
            description: row.get("description"),
            published_at: row.get("published_at"),
            views: row.get("views"),
            likes: row.get("likes"),
            dislikes: row.get("dislikes"),
            comment_count: row.get("comment_count"),
            topics: row.get("topics"),
            tags: row.get("tags"),
        })
        .collect())
}

pub async fn count_videos(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(pool)
        .await
}
