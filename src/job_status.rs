//! Job status messages streamed over the watch channel.

use serde::Deserialize;
use serde_json::value::RawValue;

/// Opaque analysis result document.
///
/// Kept as raw JSON so the payload reaches the caller byte-for-byte; the
/// client imposes no structure on it.
pub type AnalysisResult = Box<RawValue>;

/// One status message describing a job, as streamed by the server.
///
/// The wire discriminant alone decides terminality: `"result"` and
/// `"error"` frames end the stream, everything else is informational.
#[derive(Debug)]
pub enum JobStatus {
    /// Non-terminal informational update. `tag` preserves the wire
    /// discriminant (usually `"progress"`).
    Progress { tag: String, message: String },
    /// Terminal: the job finished and produced a result document.
    Result {
        message: String,
        result: Option<AnalysisResult>,
    },
    /// Terminal: the job failed server-side.
    Error { message: String },
}

/// Wire shape of a status frame:
/// `{ "type": <string>, "message": <string>, "result": <opaque JSON> }`,
/// with `message` and `result` optional.
#[derive(Deserialize)]
struct StatusFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<AnalysisResult>,
}

impl JobStatus {
    /// Whether this message ends the status stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Result { .. } | JobStatus::Error { .. })
    }

    /// Free-text message carried by the frame.
    pub fn message(&self) -> &str {
        match self {
            JobStatus::Progress { message, .. }
            | JobStatus::Result { message, .. }
            | JobStatus::Error { message } => message,
        }
    }

    pub(crate) fn from_frame(frame: &[u8]) -> serde_json::Result<Self> {
        let frame: StatusFrame = serde_json::from_slice(frame)?;
        Ok(frame.into())
    }
}

impl From<StatusFrame> for JobStatus {
    fn from(frame: StatusFrame) -> Self {
        let message = frame.message.unwrap_or_default();
        match frame.kind.as_str() {
            "result" => JobStatus::Result {
                message,
                result: frame.result,
            },
            "error" => JobStatus::Error { message },
            _ => JobStatus::Progress {
                tag: frame.kind,
                message,
            },
        }
    }
}
