//! Resumable download loop.

use crate::classify::is_retryable;
use crate::error::FetchError;
use crate::filename::parse_url;
use crate::retry::retry_strategy;
use crate::sink::Sink;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::FetchConfig;
use futures_util::StreamExt;
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, warn};
use url::Url;

/// Downloads a URL into a [`Sink`], resuming from whatever the sink already holds.
#[derive(Debug)]
pub struct Fetcher<T = ReqwestTransport> {
    transport: T,
    config: FetchConfig,
}

impl Fetcher<ReqwestTransport> {
    /// Creates a fetcher that talks HTTP through reqwest.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    /// Downloads `url` into `sink` with the configured retry budget.
    ///
    /// See [`Fetcher::fetch_with_retries`].
    pub async fn fetch<S>(&self, url: &str, sink: &mut S) -> Result<(), FetchError>
    where
        S: Sink + ?Sized,
    {
        self.fetch_with_retries(url, sink, self.config.max_retries).await
    }

    /// Same as [`Fetcher::fetch`] for a URL that is already parsed.
    pub async fn fetch_url<S>(&self, url: &Url, sink: &mut S) -> Result<(), FetchError>
    where
        S: Sink + ?Sized,
    {
        self.run(url, sink, self.config.max_retries).await
    }

    /// Downloads `url` into `sink`, retrying transient failures at most `max_retries` times.
    ///
    /// Every attempt starts at the sink's current length: a non-empty sink is
    /// completed with a `Range: bytes=<len>-` request, an empty one is filled
    /// with a plain GET.
    ///
    /// A non-2xx answer that declares `Content-Length: 0` means there is nothing
    /// left to download and counts as success. A server that does not advertise
    /// `Accept-Ranges: bytes` gets no further retries, since a retry would
    /// append the whole resource a second time.
    ///
    /// # Errors
    ///
    /// * [`FetchError::InvalidUrl`] when `url` is not an absolute URL
    /// * [`FetchError::IoError`] when the sink cannot be read or written
    /// * [`FetchError::HttpStatus`] when the server rejects the request
    /// * [`FetchError::Transport`] with the last failure once retries are spent,
    ///   or immediately for failures that are not retryable
    pub async fn fetch_with_retries<S>(
        &self,
        url: &str,
        sink: &mut S,
        max_retries: u32,
    ) -> Result<(), FetchError>
    where
        S: Sink + ?Sized,
    {
        let url = parse_url(url)?;
        self.run(&url, sink, max_retries).await
    }

    async fn run<S>(&self, url: &Url, sink: &mut S, max_retries: u32) -> Result<(), FetchError>
    where
        S: Sink + ?Sized,
    {
        let strategy = retry_strategy(max_retries, self.config.backoff, self.config.jitter);
        let sink = &Mutex::new(sink);
        let mut attempt: u32 = 0;

        Retry::spawn(strategy, || {
            attempt += 1;
            let attempt = attempt;
            async move {
                let mut sink = sink.lock().await;
                let result = self.attempt(url, &mut **sink).await;
                if let Err(RetryError::Transient { err, .. }) = &result {
                    warn!(%url, attempt, error = %err, "Transient failure");
                }
                result
            }
        })
        .await
    }

    /// One request and, on a 2xx answer, streaming of its body into the sink.
    async fn attempt<S>(&self, url: &Url, sink: &mut S) -> Result<(), RetryError<FetchError>>
    where
        S: Sink + ?Sized,
    {
        let current = sink
            .current_len()
            .await
            .map_err(|e| RetryError::permanent(e.into()))?;
        debug!(%url, offset = current, "Requesting");

        let response = match self.transport.get(url, current).await {
            Ok(response) => response,
            Err(err) => return Err(retry_error(err.into())),
        };
        let status = response.status;

        if !status.is_success() {
            if response.declared_length() == Some(0) {
                info!(%url, %status, size = current, "Nothing left to download");
                return Ok(());
            }
            return RetryError::to_permanent(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        if current > 0 && status != StatusCode::PARTIAL_CONTENT {
            warn!(
                %url,
                %status,
                offset = current,
                "Server ignored the range request, appending the full response"
            );
        }

        let resumable = response.accepts_ranges();
        if !resumable {
            warn!(%url, "Server does not accept byte ranges, retries disabled");
        }

        let mut body = response.body;
        let mut written: u64 = 0;
        while let Some(piece) = body.next().await {
            let chunk = match piece {
                Ok(chunk) => chunk,
                Err(err) if resumable => return Err(retry_error(err.into())),
                Err(err) => return RetryError::to_permanent(err.into()),
            };
            sink.write_chunk(&chunk)
                .await
                .map_err(|e| RetryError::permanent(e.into()))?;
            written += chunk.len() as u64;
        }

        debug!(%url, written, "Response body complete");
        Ok(())
    }
}

/// Transient for retryable transport failures, permanent for everything else.
fn retry_error(err: FetchError) -> RetryError<FetchError> {
    match &err {
        FetchError::Transport(e) if is_retryable(e) => RetryError::transient(err),
        _ => RetryError::permanent(err),
    }
}
