//! Core data models used throughout the harvester.
//!
//! [`VideoRecord`] is what the fetch pipeline produces and the writer
//! consumes. [`StoredVideo`] is a row read back from the `videos` table.

use serde::Serialize;

/// One video's normalized metadata.
///
/// Built once per API item by the detail fetcher and never mutated after.
/// Counters are always `>= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoRecord {
    pub id: String,
    pub channel_title: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub view_count: i64,
    pub like_count: i64,
    pub dislike_count: i64,
    pub comment_count: i64,
    /// Last path segment of each topic-category URI.
    pub topics: Vec<String>,
    pub tags: Vec<String>,
}

/// A row of the `videos` table, serialized with the column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredVideo {
    pub id: String,
    pub channel: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comment_count: i64,
    /// `;`-delimited, as stored.
    pub topics: String,
    /// `;`-delimited, as stored.
    pub tags: String,
}
