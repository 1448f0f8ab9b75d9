//! Video detail retrieval.
//!
//! Looks up ids in batches of [`DETAILS_BATCH_SIZE`] and maps every returned
//! item into a [`VideoRecord`].

use tracing::{info, warn};

use crate::error::FetchError;
use crate::http::HttpGet;
use crate::models::VideoRecord;
use crate::normalize::{extract_topics, parse_opt_or_zero};
use crate::youtube::{VideoResource, YouTubeClient};

/// Maximum number of ids the `videos` endpoint accepts per request.
pub const DETAILS_BATCH_SIZE: usize = 50;

/// Fetch and normalize details for `video_ids`.
///
/// Records come back in chunk order, and within a chunk in the order the API
/// returned them. A failed chunk aborts the whole fetch; records from earlier
/// chunks are discarded. An empty input issues no request.
pub async fn fetch_details<H: HttpGet>(
    api: &YouTubeClient<H>,
    video_ids: &[String],
) -> Result<Vec<VideoRecord>, FetchError> {
    let mut records = Vec::with_capacity(video_ids.len());

    for (batch_no, batch) in video_ids.chunks(DETAILS_BATCH_SIZE).enumerate() {
        let response = api.list_videos(batch).await?;
        let received = response.items.len();

        for item in response.items {
            if item.id.is_empty() {
                warn!(batch = batch_no, "skipping video item without id");
                continue;
            }
            records.push(to_record(item));
        }

        info!(
            batch = batch_no,
            requested = batch.len(),
            received,
            "fetched video details"
        );
    }

    Ok(records)
}

/// Map one raw API item into a normalized record.
pub fn to_record(item: VideoResource) -> VideoRecord {
    let VideoResource {
        id,
        snippet,
        statistics,
        topic_details,
    } = item;

    VideoRecord {
        id,
        channel_title: snippet.channel_title,
        title: snippet.title,
        description: snippet.description,
        published_at: snippet.published_at,
        view_count: parse_opt_or_zero(statistics.view_count.as_deref()),
        like_count: parse_opt_or_zero(statistics.like_count.as_deref()),
        dislike_count: parse_opt_or_zero(statistics.dislike_count.as_deref()),
        comment_count: parse_opt_or_zero(statistics.comment_count.as_deref()),
        topics: extract_topics(&topic_details.topic_categories),
        tags: snippet.tags,
    }
}
