//! Error types for fetch operations.

use crate::classify::classify_reqwest;
use reqwest::StatusCode;
use std::fmt;
use std::io;
use thiserror::Error;

/// Errors that can occur while fetching a file.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The download target is not a valid absolute URL.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: url::ParseError },

    /// The URL path has no final segment usable as a local file name.
    #[error("cannot derive a file name from {0}")]
    NoFilename(String),

    /// I/O error while reading or appending to the destination.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// Request or body stream failure reported by the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server rejected the request with a non-2xx status and a body.
    #[error("GET {url}: {status}")]
    HttpStatus { url: String, status: StatusCode },
}

/// How a transport failure should be treated by the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request or body read exceeded its deadline.
    Timeout,
    /// The peer reset the connection.
    ConnectionReset,
    /// The connection was closed before the response completed.
    ConnectionClosed,
    /// Anything else: DNS, refused connections, TLS, protocol errors.
    Other,
}

impl FailureKind {
    /// Whether a fresh request has a reasonable chance of succeeding.
    pub fn is_retryable(self) -> bool {
        !matches!(self, FailureKind::Other)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::Timeout => "timed out",
            FailureKind::ConnectionReset => "connection reset",
            FailureKind::ConnectionClosed => "connection closed",
            FailureKind::Other => "request failed",
        };
        f.write_str(text)
    }
}

/// A failure from the HTTP transport, tagged with its [`FailureKind`].
#[derive(Error, Debug)]
#[error("{kind}: {cause}")]
pub struct TransportError {
    kind: FailureKind,
    cause: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(
        kind: FailureKind,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = classify_reqwest(&err);
        Self::new(kind, err)
    }
}
