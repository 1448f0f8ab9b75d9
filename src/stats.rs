//! Topic and tag analysis.
//!
//! Summarizes how labels perform across the stored videos: total views,
//! number of videos carrying the label, and views per video
//! ("effectiveness"). Used by `harvest stats`.

use anyhow::Result;
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::Config;
use crate::db;
use crate::models::StoredVideo;
use crate::normalize::split_delimited;
use crate::store::{fetch_videos, VideoQuery};

/// Which delimited column to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Topics,
    Tags,
}

impl FromStr for LabelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topics" | "topic" => Ok(LabelKind::Topics),
            "tags" | "tag" => Ok(LabelKind::Tags),
            other => Err(format!("unknown label kind '{}': expected topics or tags", other)),
        }
    }
}

/// Ranking metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Views,
    Frequency,
    Effectiveness,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "views" => Ok(Metric::Views),
            "frequency" => Ok(Metric::Frequency),
            "effectiveness" => Ok(Metric::Effectiveness),
            other => Err(format!(
                "unknown metric '{}': expected views, frequency or effectiveness",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStats {
    pub label: String,
    pub views: i64,
    pub frequency: i64,
}

impl LabelStats {
    /// Average views per video carrying this label.
    pub fn effectiveness(&self) -> f64 {
        if self.frequency == 0 {
            0.0
        } else {
            self.views as f64 / self.frequency as f64
        }
    }
}

/// Accumulate views and frequency per label. Empty labels are ignored.
pub fn aggregate_labels(rows: &[StoredVideo], kind: LabelKind) -> Vec<LabelStats> {
    let mut by_label: HashMap<String, LabelStats> = HashMap::new();

    for row in rows {
        let column = match kind {
            LabelKind::Topics => &row.topics,
            LabelKind::Tags => &row.tags,
        };
        for label in split_delimited(column) {
            if label.is_empty() {
                continue;
            }
            let entry = by_label.entry(label.clone()).or_insert(LabelStats {
                label,
                views: 0,
                frequency: 0,
            });
            entry.views = entry.views.saturating_add(row.views);
            entry.frequency += 1;
        }
    }

    by_label.into_values().collect()
}

/// Sort descending by `metric` (ties by label) and keep the first `top`.
pub fn rank(mut stats: Vec<LabelStats>, metric: Metric, top: usize) -> Vec<LabelStats> {
    stats.sort_by(|a, b| {
        let ord = match metric {
            Metric::Views => b.views.cmp(&a.views),
            Metric::Frequency => b.frequency.cmp(&a.frequency),
            Metric::Effectiveness => b.effectiveness().total_cmp(&a.effectiveness()),
        };
        ord.then_with(|| a.label.cmp(&b.label))
    });
    stats.truncate(top);
    stats
}

/// Run the stats command: load every row and print the ranked labels.
pub async fn run_stats(config: &Config, kind: LabelKind, metric: Metric, top: usize) -> Result<()> {
    let pool = db::connect(config).await?;
    let rows = fetch_videos(&pool, &VideoQuery::default()).await?;
    pool.close().await;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    let ranked = rank(aggregate_labels(&rows, kind), metric, top);

    let heading = match kind {
        LabelKind::Topics => "TOPIC",
        LabelKind::Tags => "TAG",
    };

    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!("  Videos:      {}", rows.len());
    println!();

    if ranked.is_empty() {
        println!("  No {} recorded.", heading.to_lowercase());
        return Ok(());
    }

    println!(
        "  {:<32} {:>14} {:>10} {:>16}",
        heading, "VIEWS", "VIDEOS", "VIEWS/VIDEO"
    );
    println!("  {}", "-".repeat(75));
    for s in &ranked {
        println!(
            "  {:<32} {:>14} {:>10} {:>16.1}",
            s.label,
            s.views,
            s.frequency,
            s.effectiveness()
        );
    }

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
