//! Refetch - resumable single-file HTTP downloads
//!
//! This library downloads one file over HTTP into an append-only destination.
//! When the destination already holds part of the file, only the missing suffix
//! is requested, so an interrupted download can be finished by running it again.
//!
//! # Features
//!
//! - **Resumable Downloads**: Continue from the destination's current length with a `Range` request
//! - **Automatic Retry**: Timeouts and dropped connections are retried up to a fixed budget
//! - **Safe Degradation**: Servers that cannot serve byte ranges are never retried mid-body
//! - **Pluggable I/O**: Any [`Transport`] and any [`Sink`] can be used
//!
//! # Example
//!
//! ```no_run
//! use refetch::{FetchConfig, Fetcher, FileSink, Sink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(FetchConfig::default())?;
//! let mut sink = FileSink::open_append("file.bin").await?;
//!
//! fetcher.fetch("https://example.com/data/file.bin", &mut sink).await?;
//! println!("{} bytes", sink.current_len().await?);
//! # Ok(())
//! # }
//! ```

mod classify;
mod download;
mod error;
mod filename;
mod retry;
mod sink;
mod transport;
mod types;

pub use classify::{classify_chain, is_retryable};
pub use download::Fetcher;
pub use error::{FailureKind, FetchError, TransportError};
pub use filename::{derive_filename, parse_url};
pub use retry::{retry_strategy, RetryStrategy};
pub use sink::{FileSink, Sink};
pub use transport::{range_header, BodyStream, ReqwestTransport, Transport, TransportResponse};
pub use types::{Backoff, FetchConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
