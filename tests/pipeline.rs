//! Library-level tests for the sync pipeline and the data API.
//!
//! A fake channel answers the `search` and `videos` endpoints in-process, so
//! these tests exercise paging, batching, normalization and persistence
//! against a real SQLite file without any network.

use async_trait::async_trait;
use channel_harvest::config::{parse_config, Config};
use channel_harvest::db;
use channel_harvest::error::{FetchError, HarvestError};
use channel_harvest::http::{HttpGet, HttpResponse};
use channel_harvest::ingest::{sync_channel, SyncReport, SyncSettings};
use channel_harvest::migrate;
use channel_harvest::server::router;
use channel_harvest::store::{count_videos, fetch_videos, SortKey, VideoQuery};
use channel_harvest::youtube::YouTubeClient;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

// ─── Fake channel ───────────────────────────────────────────────────

/// Serves a channel of `total` videos. Page tokens are stringified offsets.
struct FakeChannel {
    total: usize,
    /// Added to every view count, so repeated syncs see fresh statistics.
    view_bump: i64,
    fail_videos_status: Option<u16>,
    requests: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl FakeChannel {
    fn new(total: usize) -> Self {
        Self {
            total,
            view_bump: 0,
            fail_videos_status: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests_to(&self, endpoint: &str) -> Vec<HashMap<String, String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.ends_with(endpoint))
            .map(|(_, q)| q.clone())
            .collect()
    }

    fn search(&self, q: &HashMap<String, String>) -> Value {
        let offset: usize = q
            .get("pageToken")
            .filter(|t| !t.is_empty())
            .map(|t| t.parse().unwrap())
            .unwrap_or(0);
        let size: usize = q["maxResults"].parse().unwrap();
        let end = (offset + size).min(self.total);
        let items: Vec<Value> = (offset..end)
            .map(|i| json!({ "kind": "youtube#searchResult", "id": { "kind": "youtube#video", "videoId": video_id(i) } }))
            .collect();
        if end < self.total {
            json!({ "items": items, "nextPageToken": end.to_string() })
        } else {
            json!({ "items": items })
        }
    }

    fn videos(&self, q: &HashMap<String, String>) -> Value {
        let items: Vec<Value> = q["id"]
            .split(',')
            .map(|id| {
                let n: i64 = id.trim_start_matches("vid").parse().unwrap();
                json!({
                    "id": id,
                    "snippet": {
                        "title": format!("Video {}", n),
                        "description": "desc",
                        "publishedAt": format!("2024-01-{:02}T00:00:00Z", (n % 28) + 1),
                        "channelTitle": "Fake Channel",
                        "tags": if n % 2 == 0 { json!(["even", "all"]) } else { json!(["all"]) }
                    },
                    "statistics": {
                        "viewCount": (n * 10 + self.view_bump).to_string(),
                        "likeCount": if n == 7 { "abc".to_string() } else { n.to_string() },
                        "commentCount": "1"
                    },
                    "topicDetails": {
                        "topicCategories": ["https://en.wikipedia.org/wiki/Music"]
                    }
                })
            })
            .collect();
        json!({ "items": items })
    }
}

fn video_id(i: usize) -> String {
    format!("vid{:03}", i)
}

#[async_trait]
impl HttpGet for FakeChannel {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, FetchError> {
        let q: HashMap<String, String> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), q.clone()));

        let body = if url.ends_with("/search") {
            self.search(&q)
        } else if url.ends_with("/videos") {
            if let Some(status) = self.fail_videos_status {
                return Ok(HttpResponse {
                    status,
                    body: "quota exceeded".to_string(),
                });
            }
            self.videos(&q)
        } else {
            return Ok(HttpResponse {
                status: 404,
                body: String::new(),
            });
        };

        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn test_config(tmp: &TempDir) -> Config {
    let db_path = tmp.path().join("harvest.sqlite");
    parse_config(&format!(
        r#"
[db]
path = "{}"

[youtube]
channel_id = "UCfake"
api_key = "test-key"
base_url = "http://fake.local/youtube/v3"

[server]
bind = "127.0.0.1:0"
"#,
        db_path.display()
    ))
    .unwrap()
}

fn settings(max: usize) -> SyncSettings {
    SyncSettings {
        channel_id: "UCfake".to_string(),
        max_videos: max,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sync_120_videos_pages_and_batches() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();

    let api = YouTubeClient::new(FakeChannel::new(300), &cfg.youtube.base_url, "test-key");
    let report = sync_channel(&api, &pool, &settings(120), false)
        .await
        .unwrap();

    assert_eq!(
        report,
        SyncReport {
            enumerated: 120,
            fetched: 120,
            written: 120
        }
    );

    let page_sizes: Vec<String> = api
        .http()
        .requests_to("/search")
        .iter()
        .map(|q| q["maxResults"].clone())
        .collect();
    assert_eq!(page_sizes, vec!["50", "50", "20"]);

    let batch_sizes: Vec<usize> = api
        .http()
        .requests_to("/videos")
        .iter()
        .map(|q| q["id"].split(',').count())
        .collect();
    assert_eq!(batch_sizes, vec![50, 50, 20]);

    assert_eq!(count_videos(&pool).await.unwrap(), 120);

    let rows = fetch_videos(
        &pool,
        &VideoQuery {
            sort: SortKey::Views,
            ascending: true,
            limit: Some(8),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rows[0].id, "vid000");
    assert_eq!(rows[0].topics, "Music");
    assert_eq!(rows[0].tags, "even;all");
    assert_eq!(rows[1].tags, "all");
    // "abc" like count
    assert_eq!(rows[7].id, "vid007");
    assert_eq!(rows[7].likes, 0);
    assert_eq!(rows[7].channel, "Fake Channel");

    pool.close().await;
}

#[tokio::test]
async fn test_small_channel_ends_on_missing_token() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();

    let api = YouTubeClient::new(FakeChannel::new(73), &cfg.youtube.base_url, "test-key");
    let report = sync_channel(&api, &pool, &settings(500), false)
        .await
        .unwrap();

    assert_eq!(report.enumerated, 73);
    assert_eq!(report.written, 73);
    assert_eq!(api.http().requests_to("/search").len(), 2);
    pool.close().await;
}

#[tokio::test]
async fn test_resync_updates_counters_only() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();

    let first = YouTubeClient::new(FakeChannel::new(5), &cfg.youtube.base_url, "test-key");
    sync_channel(&first, &pool, &settings(5), false)
        .await
        .unwrap();

    // Overwrite an immutable column to prove the second sync leaves it alone
    sqlx::query("UPDATE videos SET title = 'Pinned title' WHERE id = 'vid003'")
        .execute(&pool)
        .await
        .unwrap();

    let mut channel = FakeChannel::new(5);
    channel.view_bump = 1000;
    let second = YouTubeClient::new(channel, &cfg.youtube.base_url, "test-key");
    sync_channel(&second, &pool, &settings(5), false)
        .await
        .unwrap();

    assert_eq!(count_videos(&pool).await.unwrap(), 5);
    let rows = fetch_videos(
        &pool,
        &VideoQuery {
            title_contains: Some("pinned".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "vid003");
    assert_eq!(rows[0].views, 1030);
    pool.close().await;
}

#[tokio::test]
async fn test_details_failure_aborts_run() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();

    let mut channel = FakeChannel::new(10);
    channel.fail_videos_status = Some(403);
    let api = YouTubeClient::new(channel, &cfg.youtube.base_url, "test-key");

    let err = sync_channel(&api, &pool, &settings(10), false)
        .await
        .unwrap_err();
    match err {
        HarvestError::Fetch(FetchError::Status { status, .. }) => assert_eq!(status, 403),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(count_videos(&pool).await.unwrap(), 0);
    pool.close().await;
}

#[tokio::test]
async fn test_data_api_serves_rows() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();

    let api = YouTubeClient::new(FakeChannel::new(3), &cfg.youtube.base_url, "test-key");
    sync_channel(&api, &pool, &settings(3), false)
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(pool.clone());
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let resp = client
        .get(format!("http://{}/api/data", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let rows: Value = resp.json().await.unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    let first = &rows[0];
    for column in [
        "id",
        "channel",
        "title",
        "description",
        "published_at",
        "views",
        "likes",
        "dislikes",
        "comment_count",
        "topics",
        "tags",
    ] {
        assert!(first.get(column).is_some(), "missing column {}", column);
    }

    let cors = client
        .get(format!("http://{}/api/data", addr))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(
        cors.headers()
            .get("access-control-allow-origin")
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );

    server_handle.abort();
}
