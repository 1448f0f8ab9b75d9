//! # Channel Harvest CLI (`harvest`)
//!
//! ## Usage
//!
//! ```bash
//! harvest --config ./config/harvest.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `harvest init` | Create the SQLite database and the `videos` table |
//! | `harvest sync` | Enumerate, fetch and upsert the configured channel |
//! | `harvest list` | Print stored videos |
//! | `harvest stats` | Rank topics or tags by views, frequency or effectiveness |
//! | `harvest serve` | Serve the table as JSON over HTTP |

use channel_harvest::store::{SortKey, VideoQuery};
use channel_harvest::stats::{LabelKind, Metric};
use channel_harvest::{config, ingest, list, logging, migrate, server, stats};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Channel Harvest: pull a YouTube channel's video metadata into SQLite.
#[derive(Parser)]
#[command(
    name = "harvest",
    about = "Fetch a YouTube channel's video metadata and upsert it into SQLite",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/harvest.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and the `videos` table. Safe to run repeatedly.
    Init,

    /// Harvest a channel: list its videos, fetch details, upsert rows.
    ///
    /// The first failed request or write aborts the run. Rows written
    /// before the failure stay in the database.
    Sync {
        /// Channel id to harvest instead of `youtube.channel_id`.
        #[arg(long)]
        channel: Option<String>,

        /// Maximum number of videos instead of `youtube.max_videos`.
        #[arg(long)]
        max: Option<usize>,

        /// Fetch everything but skip the database writes.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print stored videos.
    List {
        /// Sort column: published, views, likes, dislikes, comments, title.
        #[arg(long, default_value = "published")]
        sort: SortKey,

        /// Ascending order (default is descending).
        #[arg(long)]
        asc: bool,

        /// Only titles containing this text (case-insensitive).
        #[arg(long)]
        title: Option<String>,

        /// Only descriptions containing this text (case-insensitive).
        #[arg(long)]
        description: Option<String>,

        /// Only videos with this topic.
        #[arg(long)]
        topic: Option<String>,

        /// Only videos with this tag.
        #[arg(long)]
        tag: Option<String>,

        /// Maximum number of rows.
        #[arg(long)]
        limit: Option<i64>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Rank topics or tags across stored videos.
    Stats {
        /// `topics` or `tags`.
        #[arg(long, default_value = "topics")]
        by: LabelKind,

        /// `views`, `frequency` or `effectiveness` (views per video).
        #[arg(long, default_value = "views")]
        metric: Metric,

        /// Number of labels to show.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Serve the stored videos as JSON (`GET /api/data`).
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing("info")?;

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Sync {
            channel,
            max,
            dry_run,
        } => {
            ingest::run_sync(&cfg, channel, max, dry_run).await?;
        }
        Commands::List {
            sort,
            asc,
            title,
            description,
            topic,
            tag,
            limit,
            json,
        } => {
            let query = VideoQuery {
                sort,
                ascending: asc,
                title_contains: title,
                description_contains: description,
                topic,
                tag,
                limit,
            };
            list::run_list(&cfg, &query, json).await?;
        }
        Commands::Stats { by, metric, top } => {
            stats::run_stats(&cfg, by, metric, top).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
