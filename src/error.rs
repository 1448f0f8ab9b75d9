//! Error types for the harvest pipeline.
//!
//! Fetch and write failures are kept apart so callers can tell which stage
//! aborted a run. Neither kind is ever retried: the first error ends the
//! stage and the whole sync.

use thiserror::Error;

/// Failure while talking to the video API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("{endpoint} request failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The API answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON shape we expect.
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn transport(endpoint: impl Into<String>, err: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }
}

/// Failure while persisting a record.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to upsert video {id}: {source}")]
    Statement {
        id: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Any error that aborts a sync run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
