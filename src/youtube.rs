//! YouTube Data API v3 client.
//!
//! Wraps an [`HttpGet`] with the base URL and API key and exposes the two
//! endpoints the pipeline needs: `search` (channel listing) and `videos`
//! (details). Response bodies are decoded into the schema structs below.
//! Container and string fields decode a missing key or an explicit `null`
//! as empty instead of failing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::FetchError;
use crate::http::HttpGet;

/// Parts requested from the `videos` endpoint.
pub const VIDEO_PARTS: &str = "id,snippet,statistics,topicDetails";

/// `null` decodes as `T::default()`. Pair with `#[serde(default)]` for absent keys.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// --- Search (listing) ---

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<SearchResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: SearchResultId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_id: String,
}

// --- Videos (details) ---

#[derive(Debug, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub snippet: VideoSnippet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub statistics: VideoStatistics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_details: TopicDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Counters arrive as decimal strings; any of them may be absent (e.g.
/// `dislikeCount` is no longer public, `likeCount` can be hidden).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub dislike_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_categories: Vec<String>,
}

// --- Client ---

pub struct YouTubeClient<H> {
    http: H,
    base_url: String,
    api_key: String,
}

impl<H: HttpGet> YouTubeClient<H> {
    pub fn new(http: H, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Fetch one page of a channel's videos.
    pub async fn search_page(
        &self,
        channel_id: &str,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, FetchError> {
        let query = vec![
            ("part", "snippet".to_string()),
            ("channelId", channel_id.to_string()),
            ("type", "video".to_string()),
            ("maxResults", max_results.to_string()),
            ("pageToken", page_token.unwrap_or_default().to_string()),
        ];
        self.get_json("search", query).await
    }

    /// Fetch details for up to 50 ids in one request.
    pub async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse, FetchError> {
        let query = vec![
            ("part", VIDEO_PARTS.to_string()),
            ("id", ids.join(",")),
        ];
        self.get_json("videos", query).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut query: Vec<(&str, String)>,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        query.push(("key", self.api_key.clone()));

        let resp = self.http.get(&url, &query).await?;
        debug!(endpoint, status = resp.status, bytes = resp.body.len(), "api response");

        if !resp.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: resp.status,
                body: resp.body.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&resp.body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}
