//! `harvest list`: print stored videos as a table or JSON.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::models::StoredVideo;
use crate::store::{fetch_videos, VideoQuery};

pub async fn run_list(config: &Config, query: &VideoQuery, json: bool) -> Result<()> {
    let pool = db::connect(config).await?;
    let rows = fetch_videos(&pool, query).await?;
    pool.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No videos stored.");
        return Ok(());
    }

    println!(
        "{:<12} {:<11} {:>12} {:>9} {:>8}  TITLE",
        "ID", "PUBLISHED", "VIEWS", "LIKES", "COMMENTS"
    );
    for row in &rows {
        print_row(row);
    }
    println!();
    println!("{} video(s)", rows.len());

    Ok(())
}

fn print_row(row: &StoredVideo) {
    println!(
        "{:<12} {:<11} {:>12} {:>9} {:>8}  {}",
        row.id,
        published_date(&row.published_at),
        row.views,
        row.likes,
        row.comment_count,
        truncate(&row.title, 60)
    );
}

/// `2024-03-01T12:00:00Z` → `2024-03-01`. Unparsable values are shown as-is.
fn published_date(published_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(published_at)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| published_at.to_string())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
