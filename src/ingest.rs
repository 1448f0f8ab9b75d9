//! Sync pipeline orchestration.
//!
//! Coordinates the full flow for one channel: enumerate ids → fetch details →
//! upsert rows. Every stage runs to completion before the next starts, and
//! the first error ends the run.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::details::fetch_details;
use crate::enumerate::enumerate_channel_videos;
use crate::error::HarvestError;
use crate::http::{HttpGet, ReqwestHttp};
use crate::store::persist;
use crate::youtube::YouTubeClient;

/// What to harvest in a single run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub channel_id: String,
    pub max_videos: usize,
}

/// Counts produced by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Ids returned by the channel listing.
    pub enumerated: usize,
    /// Records built from the detail lookups.
    pub fetched: usize,
    /// Rows upserted (0 on a dry run).
    pub written: usize,
}

/// Run enumerate → fetch → persist for one channel.
///
/// With `dry_run` the persist step is skipped.
pub async fn sync_channel<H: HttpGet>(
    api: &YouTubeClient<H>,
    pool: &SqlitePool,
    settings: &SyncSettings,
    dry_run: bool,
) -> Result<SyncReport, HarvestError> {
    let video_ids =
        enumerate_channel_videos(api, &settings.channel_id, settings.max_videos).await?;
    info!(count = video_ids.len(), channel_id = %settings.channel_id, "enumerated channel videos");

    let records = fetch_details(api, &video_ids).await?;
    info!(count = records.len(), "fetched video details");

    let written = if dry_run {
        0
    } else {
        let n = persist(pool, &records).await?;
        info!(count = n, "persisted videos");
        n
    };

    Ok(SyncReport {
        enumerated: video_ids.len(),
        fetched: records.len(),
        written,
    })
}

/// Entry point for `harvest sync`.
///
/// `channel` and `max` override the configured values for this run only.
pub async fn run_sync(
    config: &Config,
    channel: Option<String>,
    max: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let settings = SyncSettings {
        channel_id: channel.unwrap_or_else(|| config.youtube.channel_id.clone()),
        max_videos: max.unwrap_or(config.youtube.max_videos),
    };

    let api_key = config.youtube.resolve_api_key()?;
    let api = YouTubeClient::new(ReqwestHttp::new(), &config.youtube.base_url, api_key);
    let pool = db::connect(config).await?;

    let result = sync_channel(&api, &pool, &settings, dry_run).await;
    pool.close().await;
    let report = result?;

    if dry_run {
        println!("sync {} (dry-run)", settings.channel_id);
    } else {
        println!("sync {}", settings.channel_id);
    }
    println!("  listed: {} videos", report.enumerated);
    println!("  fetched details: {}", report.fetched);
    if !dry_run {
        println!("  upserted videos: {}", report.written);
    }
    println!("ok");

    Ok(())
}
