//! WebSocket watch channel: streams job status until a terminal message.

use futures::{SinkExt, StreamExt};
use log::debug;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::error::ClientError;
use super::AnalysisClient;
use crate::job_status::{AnalysisResult, JobStatus};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// First frame sent on a watch connection; binds it to one job for the
/// connection's lifetime.
#[derive(Serialize)]
struct WatchHello<'a> {
    token: &'a str,
    job_id: u64,
}

impl AnalysisClient {
    /// Stream status messages for `job_id`, delivering each to
    /// `on_status` in receipt order.
    ///
    /// The callback returns `Ok(true)` to stop early; an `Err` halts the
    /// loop and surfaces. Independent of the callback, a terminal message
    /// (`result` or `error`) always ends the loop after being delivered.
    /// The connection is closed on every exit path.
    pub async fn watch_job<F>(&self, job_id: u64, mut on_status: F) -> Result<(), ClientError>
    where
        F: FnMut(JobStatus) -> Result<bool, ClientError>,
    {
        let mut request = self.ws_url().as_str().into_client_request()?;
        request
            .headers_mut()
            .insert(ORIGIN, HeaderValue::from_str(self.origin())?);

        debug!("opening watch channel to {} for job {}", self.ws_url(), job_id);
        let (mut ws, _) = connect_async(request).await?;

        let hello = serde_json::to_string(&WatchHello {
            token: self.token(),
            job_id,
        })?;
        let outcome = drive(&mut ws, hello, &mut on_status).await;

        // Best effort: the server may already have dropped the connection.
        if let Err(err) = ws.close(None).await {
            debug!("closing watch channel for job {}: {}", job_id, err);
        }
        outcome
    }

    /// Watch `job_id` ignoring intermediate updates. Returns the last
    /// message observed, or `None` when the stream closed silently.
    pub async fn wait_for_job(&self, job_id: u64) -> Result<Option<JobStatus>, ClientError> {
        let mut last = None;
        self.watch_job(job_id, |status| {
            last = Some(status);
            Ok(false)
        })
        .await?;
        Ok(last)
    }

    /// Wait for the terminal status of `job_id` and convert it into the
    /// final analysis outcome.
    pub async fn wait_for_job_result(&self, job_id: u64) -> Result<AnalysisResult, ClientError> {
        match self.wait_for_job(job_id).await? {
            Some(JobStatus::Result {
                result: Some(result),
                ..
            }) => Ok(result),
            Some(JobStatus::Result { result: None, .. }) => Err(ClientError::Job {
                job_id,
                message: "result message lacks a result payload".into(),
            }),
            Some(JobStatus::Error { message }) => Err(ClientError::Job { job_id, message }),
            Some(JobStatus::Progress { tag, .. }) => {
                Err(ClientError::UnexpectedStatus { job_id, tag })
            }
            None => Err(ClientError::StreamEnded { job_id }),
        }
    }
}

async fn drive<F>(ws: &mut WsStream, hello: String, on_status: &mut F) -> Result<(), ClientError>
where
    F: FnMut(JobStatus) -> Result<bool, ClientError>,
{
    ws.send(Message::Text(hello)).await?;

    while let Some(frame) = ws.next().await {
        let status = match frame? {
            Message::Text(text) => JobStatus::from_frame(text.as_bytes())?,
            Message::Binary(data) => JobStatus::from_frame(&data)?,
            Message::Ping(payload) => {
                ws.send(Message::Pong(payload)).await?;
                continue;
            }
            Message::Pong(_) | Message::Frame(_) => continue,
            Message::Close(_) => break,
        };
        let terminal = status.is_terminal();
        if on_status(status)? || terminal {
            return Ok(());
        }
    }
    // The server went away without a terminal message; whether that is an
    // error is the caller's call.
    Ok(())
}
