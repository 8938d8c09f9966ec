//! Configuration for fetch operations.

use std::time::Duration;

/// Retries granted to one top-level fetch when nothing else is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Deadline for a single HTTP round trip, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Delay strategy applied between retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Wait the same amount before every retry.
    Fixed(Duration),
    /// Start at `base` and double on every retry, never exceeding `max`.
    Exponential { base: Duration, max: Duration },
}

/// Configuration for a [`Fetcher`](crate::Fetcher).
///
/// # Example
///
/// ```
/// use refetch::{Backoff, FetchConfig};
/// use std::time::Duration;
///
/// let config = FetchConfig {
///     max_retries: 3,
///     backoff: Backoff::Fixed(Duration::from_secs(2)),
///     ..FetchConfig::default()
/// };
/// assert_eq!(config.timeout, Duration::from_secs(300));
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Retries allowed after transient failures (default: 10).
    pub max_retries: u32,
    /// Per-request timeout covering connect, headers and body (default: 5 minutes).
    pub timeout: Duration,
    /// Delay between retries (default: none).
    pub backoff: Backoff,
    /// Randomise backoff delays.
    pub jitter: bool,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            backoff: Backoff::None,
            jitter: false,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
