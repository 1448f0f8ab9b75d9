//! # Channel Harvest
//!
//! Fetches a YouTube channel's video metadata and upserts it into SQLite.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────┐
//! │  Enumerate  │──▶│ Fetch details │──▶│  Upsert   │
//! │ search API  │   │  videos API   │   │  SQLite   │
//! └─────────────┘   └──────────────┘   └────┬─────┘
//!                                           │
//!                      ┌────────────────────┤
//!                      ▼                    ▼
//!                 ┌──────────┐        ┌──────────┐
//!                 │   CLI    │        │   HTTP   │
//!                 │list/stats│        │ /api/data│
//!                 └──────────┘        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! harvest init                      # create database
//! harvest sync                      # harvest the configured channel
//! harvest list --sort views --limit 20
//! harvest stats --by topics --metric effectiveness
//! harvest serve                     # JSON API on [server].bind
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`normalize`] | Field parsing and delimited lists |
//! | [`http`] | HTTP GET capability |
//! | [`youtube`] | YouTube Data API client and response schema |
//! | [`enumerate`] | Channel video listing |
//! | [`details`] | Batched detail lookup |
//! | [`store`] | Upserts and read-back queries |
//! | [`ingest`] | Sync pipeline |
//! | [`stats`] | Topic and tag analysis |
//! | [`server`] | JSON data API |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod config;
pub mod db;
pub mod details;
pub mod enumerate;
pub mod error;
pub mod http;
pub mod ingest;
pub mod list;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod server;
pub mod stats;
pub mod store;
pub mod youtube;
