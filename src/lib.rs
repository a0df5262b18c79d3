//! Client library for the Relwarc remote JavaScript analysis service.
//!
//! Analysis is asynchronous server-side: a submission over HTTP yields a
//! numeric job identifier, and the job's progress and final result are
//! streamed back over a WebSocket connection. [`AnalysisClient`] wraps both
//! halves behind three one-call operations:
//!
//! ```no_run
//! # async fn run() -> Result<(), relwarc_client::ClientError> {
//! let client = relwarc_client::AnalysisClient::new("my-api-token")?;
//! let result = client.analyze_page_url("https://example.com/").await?;
//! println!("{}", result.get());
//! # Ok(())
//! # }
//! ```
//!
//! The analysis result itself is an opaque JSON document; the client never
//! interprets it.

pub mod client;
pub mod config;
pub mod consts;
pub mod job_status;
pub mod source;

pub use client::error::ClientError;
pub use client::AnalysisClient;
pub use consts::DEFAULT_SERVER_ADDR;
pub use job_status::{AnalysisResult, JobStatus};
pub use source::AnalysisSource;
