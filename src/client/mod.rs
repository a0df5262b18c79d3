//! Relwarc analysis client.
//!
//! [`AnalysisClient`] composes the two halves of the job lifecycle
//! protocol: HTTP submission (the `submit` module) and WebSocket job
//! watching (the `watch` module). Each `analyze_*` call performs one
//! submission, then follows the job's status stream to its terminal
//! message.

pub mod error;
mod submit;
#[cfg(test)]
pub(crate) mod test_support;
mod watch;

use crate::consts;
use crate::job_status::AnalysisResult;
use crate::source::AnalysisSource;
use error::ClientError;
use reqwest::Client;
use url::Url;

/// Client for the Relwarc analysis API.
///
/// Immutable after construction: the effective addresses are derived once,
/// and a single instance may serve any number of concurrent analysis
/// calls, each owning its own HTTP request and watch connection.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    token: String,
    server_addr: Url,
    ws_url: Url,
    origin: String,
    http: Client,
}

impl AnalysisClient {
    /// Create a client for the well-known Relwarc server.
    pub fn new(token: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_server(token, consts::DEFAULT_SERVER_ADDR)
    }

    /// Create a client for a specific server address.
    ///
    /// Derives the WebSocket watch URL (scheme remapped `http` → `ws`,
    /// watch path appended) and the `Origin` handshake value
    /// (scheme + host of the base address) up front.
    pub fn with_server(token: impl Into<String>, server_addr: &str) -> Result<Self, ClientError> {
        let server_addr = Url::parse(server_addr)?;
        let origin = server_addr.origin().ascii_serialization();
        let ws_url = derive_ws_url(&server_addr)?;
        Ok(Self {
            token: token.into(),
            server_addr,
            ws_url,
            origin,
            http: Client::new(),
        })
    }

    /// Submit JavaScript source code and wait for the analysis result.
    pub async fn analyze_source_code(
        &self,
        source_code: impl Into<AnalysisSource>,
    ) -> Result<AnalysisResult, ClientError> {
        let job_id = self.submit_source_code(source_code).await?;
        self.wait_for_job_result(job_id).await
    }

    /// Submit a page URL and wait for the analysis result.
    pub async fn analyze_page_url(&self, page_url: &str) -> Result<AnalysisResult, ClientError> {
        let job_id = self.submit_page_url(page_url).await?;
        self.wait_for_job_result(job_id).await
    }

    /// Submit a captured page as a TAR archive and wait for the analysis
    /// result.
    pub async fn analyze_page_tar(
        &self,
        tar_archive: impl Into<AnalysisSource>,
    ) -> Result<AnalysisResult, ClientError> {
        let job_id = self.submit_tar_archive(tar_archive).await?;
        self.wait_for_job_result(job_id).await
    }

    /// The API token presented on every request.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The HTTP base address submissions go to.
    pub fn server_addr(&self) -> &Url {
        &self.server_addr
    }

    /// The derived WebSocket watch address.
    pub fn ws_url(&self) -> &Url {
        &self.ws_url
    }

    /// The derived `Origin` value sent on the watch handshake.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_addr.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

fn derive_ws_url(server_addr: &Url) -> Result<Url, ClientError> {
    let scheme = server_addr.scheme().replacen("http", "ws", 1);
    let mut ws_url = server_addr.clone();
    ws_url
        .set_scheme(&scheme)
        .map_err(|_| ClientError::BadScheme { scheme })?;
    let path = format!(
        "{}{}",
        server_addr.path().trim_end_matches('/'),
        consts::JOB_WATCH_PATH
    );
    ws_url.set_path(&path);
    Ok(ws_url)
}
