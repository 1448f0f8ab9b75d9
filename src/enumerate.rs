//! Channel video enumeration.
//!
//! Pages through the `search` listing of a channel until `max_count` ids are
//! collected or the API stops handing out page tokens.

use tracing::info;

use crate::error::FetchError;
use crate::http::HttpGet;
use crate::youtube::YouTubeClient;

/// Largest page the listing endpoint accepts.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Collect up to `max_count` video ids for `channel_id`, in API order.
///
/// Each page asks for `min(DEFAULT_PAGE_SIZE, max_count - collected)` items,
/// so `max_count = 120` issues pages of 50, 50 and 20. The loop ends when
/// enough ids are collected, when the next page token is missing or empty,
/// or when a page comes back empty. Any failed request aborts the whole
/// enumeration.
pub async fn enumerate_channel_videos<H: HttpGet>(
    api: &YouTubeClient<H>,
    channel_id: &str,
    max_count: usize,
) -> Result<Vec<String>, FetchError> {
    let mut video_ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;

    while video_ids.len() < max_count {
        let page_size = DEFAULT_PAGE_SIZE.min(max_count - video_ids.len());
        let page = api
            .search_page(channel_id, page_size, page_token.as_deref())
            .await?;

        let received = page.items.len();
        video_ids.extend(page.items.into_iter().map(|item| item.id.video_id));

        info!(
            channel_id,
            requested = page_size,
            received,
            total = video_ids.len(),
            "listed page"
        );

        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(token) if received > 0 => page_token = Some(token),
            _ => break,
        }
    }

    video_ids.truncate(max_count);
    Ok(video_ids)
}
