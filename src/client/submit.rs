//! HTTP submission of analysis payloads.

use log::{debug, info};
use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use super::error::ClientError;
use super::AnalysisClient;
use crate::consts::{self, content_types, endpoints};
use crate::source::{AnalysisSource, ResolvedBody};

/// Synchronous half of the protocol: the server answers a submission with
/// either a job identifier or an error message.
#[derive(Deserialize)]
struct SubmitResponse {
    job_id: Option<u64>,
    error: Option<String>,
}

impl AnalysisClient {
    /// Submit a page URL for analysis. Returns the job identifier.
    pub async fn submit_page_url(&self, page_url: &str) -> Result<u64, ClientError> {
        self.submit(
            endpoints::ANALYZE_URL,
            content_types::PAGE_URL,
            AnalysisSource::from(page_url),
        )
        .await
    }

    /// Submit JavaScript source code for analysis. Returns the job
    /// identifier.
    pub async fn submit_source_code(
        &self,
        source_code: impl Into<AnalysisSource>,
    ) -> Result<u64, ClientError> {
        self.submit(
            endpoints::ANALYZE_CODE,
            content_types::SOURCE_CODE,
            source_code.into(),
        )
        .await
    }

    /// Submit a captured page as a TAR archive. Returns the job
    /// identifier.
    pub async fn submit_tar_archive(
        &self,
        tar_archive: impl Into<AnalysisSource>,
    ) -> Result<u64, ClientError> {
        self.submit(
            endpoints::ANALYZE_TAR,
            content_types::TAR_ARCHIVE,
            tar_archive.into(),
        )
        .await
    }

    async fn submit(
        &self,
        path: &str,
        content_type: &str,
        source: AnalysisSource,
    ) -> Result<u64, ClientError> {
        let endpoint = self.endpoint_url(path);
        let token = HeaderValue::from_str(self.token())?;
        let mut request = self
            .http()
            .post(&endpoint)
            .header(consts::API_TOKEN_HEADER, token)
            .header(CONTENT_TYPE, content_type);

        request = match source.resolve().await? {
            // Some intermediaries treat an empty body and no body
            // differently; send none, with the length spelled out.
            ResolvedBody::Empty => request.header(CONTENT_LENGTH, 0),
            ResolvedBody::Buffered(bytes) => request.body(bytes),
            ResolvedBody::Sized { file, len } => request
                .header(CONTENT_LENGTH, len)
                .body(reqwest::Body::wrap_stream(ReaderStream::new(file))),
        };

        debug!("submitting analysis request to {}", endpoint);
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let parsed: serde_json::Result<SubmitResponse> = serde_json::from_slice(&body);

        if status != 200 {
            let message = match parsed {
                Ok(data) => data.error.unwrap_or_default(),
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            return Err(ClientError::Api {
                endpoint,
                status,
                message,
            });
        }

        match parsed?.job_id {
            Some(job_id) => {
                info!("{} accepted job {}", endpoint, job_id);
                Ok(job_id)
            }
            None => Err(ClientError::Api {
                endpoint,
                status,
                message: "missing job_id in server response".into(),
            }),
        }
    }
}
