//! HTTP transport used by the fetcher.

use crate::error::{FetchError, TransportError};
use crate::types::FetchConfig;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH, RANGE};
use reqwest::StatusCode;
use url::Url;

/// Response body as a stream of chunks.
pub type BodyStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Status, headers and body of one GET.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl TransportResponse {
    /// Whether the server advertises `Accept-Ranges: bytes`.
    pub fn accepts_ranges(&self) -> bool {
        self.headers
            .get(ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("bytes"))
    }

    /// The `Content-Length` declared by the server, if any.
    pub fn declared_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Issues GET requests, optionally starting at a byte offset.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Requests `url`. When `offset > 0` only the bytes from `offset` onwards are asked for.
    async fn get(&self, url: &Url, offset: u64) -> Result<TransportResponse, TransportError>;
}

/// `Range` header value asking for everything from `offset` to the end.
///
/// No header is needed for a download starting at byte zero.
pub fn range_header(offset: u64) -> Option<String> {
    (offset > 0).then(|| format!("bytes={}-", offset))
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url, offset: u64) -> Result<TransportResponse, TransportError> {
        let mut request = self.client.get(url.clone());
        if let Some(range) = range_header(offset) {
            request = request.header(RANGE, range);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from))
            .boxed();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
