//! Submission payloads and length resolution.
//!
//! The submission endpoints require an exact `Content-Length` up front.
//! [`AnalysisSource`] records, at the API boundary, whether a payload's
//! length is cheap to query (in-memory bytes, stat-able file) or must be
//! discovered by buffering the whole source.

use bytes::Bytes;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// A byte source submitted for analysis.
pub enum AnalysisSource {
    /// Fully in-memory payload; replayable, length known.
    Bytes(Bytes),
    /// Open file; the length comes from its metadata when it is a regular
    /// file, so the handle is streamed without buffering.
    File(tokio::fs::File),
    /// Arbitrary reader of unknown length; buffered fully on resolve.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

/// A payload resolved to a known length, ready to frame as a request body.
pub(crate) enum ResolvedBody {
    /// Zero bytes: the request carries no body at all.
    Empty,
    /// In-memory bytes; the HTTP layer derives the length itself.
    Buffered(Bytes),
    /// Regular file streamed as-is, with the length taken from stat.
    Sized { file: tokio::fs::File, len: u64 },
}

impl AnalysisSource {
    /// Wrap an arbitrary reader. The `From` impls cover the common cases;
    /// this exists for pipes, sockets and the like.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        AnalysisSource::Reader(Box::new(reader))
    }

    /// Determine the payload's exact length, buffering only when the
    /// source does not expose one cheaply. Read errors surface verbatim.
    pub(crate) async fn resolve(self) -> io::Result<ResolvedBody> {
        match self {
            AnalysisSource::Bytes(bytes) => Ok(ResolvedBody::from_bytes(bytes)),
            AnalysisSource::File(file) => {
                let metadata = file.metadata().await?;
                if metadata.is_file() {
                    return Ok(match metadata.len() {
                        0 => ResolvedBody::Empty,
                        len => ResolvedBody::Sized { file, len },
                    });
                }
                // Pipes and devices report no usable length; buffer them.
                buffer(file).await
            }
            AnalysisSource::Reader(reader) => buffer(reader).await,
        }
    }
}

async fn buffer<R: AsyncRead + Unpin>(mut reader: R) -> io::Result<ResolvedBody> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    Ok(ResolvedBody::from_bytes(Bytes::from(data)))
}

impl ResolvedBody {
    fn from_bytes(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            ResolvedBody::Empty
        } else {
            ResolvedBody::Buffered(bytes)
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> u64 {
        match self {
            ResolvedBody::Empty => 0,
            ResolvedBody::Buffered(bytes) => bytes.len() as u64,
            ResolvedBody::Sized { len, .. } => *len,
        }
    }
}

impl From<Bytes> for AnalysisSource {
    fn from(bytes: Bytes) -> Self {
        AnalysisSource::Bytes(bytes)
    }
}

impl From<Vec<u8>> for AnalysisSource {
    fn from(data: Vec<u8>) -> Self {
        AnalysisSource::Bytes(Bytes::from(data))
    }
}

impl From<&[u8]> for AnalysisSource {
    fn from(data: &[u8]) -> Self {
        AnalysisSource::Bytes(Bytes::copy_from_slice(data))
    }
}

impl From<String> for AnalysisSource {
    fn from(text: String) -> Self {
        AnalysisSource::Bytes(Bytes::from(text.into_bytes()))
    }
}

impl From<&str> for AnalysisSource {
    fn from(text: &str) -> Self {
        AnalysisSource::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl From<tokio::fs::File> for AnalysisSource {
    fn from(file: tokio::fs::File) -> Self {
        AnalysisSource::File(file)
    }
}

impl From<std::fs::File> for AnalysisSource {
    fn from(file: std::fs::File) -> Self {
        AnalysisSource::File(tokio::fs::File::from_std(file))
    }
}
