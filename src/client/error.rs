//! Error handling for the analysis client.

use thiserror::Error;

/// Everything an analysis call can fail with.
///
/// No variant is retried internally; errors surface to the caller as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failure while submitting a payload.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport failure on the watch channel.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The server rejected a submission with a non-200 status.
    #[error("Relwarc API endpoint {endpoint} responded with status {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The server reported a job-scoped failure over the watch channel.
    #[error("Relwarc failed to execute job {job_id}: {message}")]
    Job { job_id: u64, message: String },

    /// Protocol violation: the stream ended on a non-terminal message.
    #[error("unexpected status type {tag:?} for job {job_id}")]
    UnexpectedStatus { job_id: u64, tag: String },

    /// Protocol violation: the stream closed before any message arrived.
    #[error("watch stream for job {job_id} closed before a terminal message")]
    StreamEnded { job_id: u64 },

    /// A server response or status frame failed to decode.
    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a submission payload failed.
    #[error("payload I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server address does not parse as a URL.
    #[error("invalid server address: {0}")]
    Address(#[from] url::ParseError),

    /// The server address scheme has no WebSocket equivalent.
    #[error("cannot derive a WebSocket scheme from {scheme:?}")]
    BadScheme { scheme: String },

    /// A derived header value was rejected (e.g. a malformed API token).
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}
