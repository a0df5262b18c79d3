//! Protocol constants for the Relwarc API.

/// Well-known Relwarc server, used when no address override is given.
pub const DEFAULT_SERVER_ADDR: &str = "https://relwarc.solidpoint.net";

/// Header carrying the caller's API token on submission requests.
pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// Path of the WebSocket endpoint streaming job status updates.
pub const JOB_WATCH_PATH: &str = "/api/job/watch";

/// Submission endpoint paths, one per payload kind.
pub mod endpoints {
    pub const ANALYZE_URL: &str = "/api/analyze-url";
    pub const ANALYZE_CODE: &str = "/api/analyze-code";
    pub const ANALYZE_TAR: &str = "/api/analyze-tar";
}

/// Content types matching the submission endpoints.
pub mod content_types {
    pub const PAGE_URL: &str = "text/plain";
    pub const SOURCE_CODE: &str = "text/javascript";
    pub const TAR_ARCHIVE: &str = "application/x-tar";
}
