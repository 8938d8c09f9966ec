//! Delay strategies fed to the retry runner.

use crate::types::Backoff;
use std::time::Duration;
use tokio_retry2::strategy::{jitter, FixedInterval};

/// Delays for one fetch, one per retry.
pub type RetryStrategy = Box<dyn Iterator<Item = Duration> + Send>;

/// Builds the delay sequence for `max_retries` retries.
///
/// The sequence yields exactly `max_retries` items, so the runner makes at
/// most `max_retries + 1` attempts. With `with_jitter` every delay is
/// randomised but never exceeds its cap: the fixed delay, or `max` for
/// exponential backoff.
pub fn retry_strategy(max_retries: u32, backoff: Backoff, with_jitter: bool) -> RetryStrategy {
    let (delays, cap): (RetryStrategy, Duration) = match backoff {
        Backoff::None => (Box::new(FixedInterval::new(Duration::ZERO)), Duration::ZERO),
        Backoff::Fixed(delay) => (Box::new(FixedInterval::new(delay)), delay),
        Backoff::Exponential { base, max } => (
            Box::new((0u32..).map(move |n| base.saturating_mul(2u32.saturating_pow(n)).min(max))),
            max,
        ),
    };

    let delays: RetryStrategy = if with_jitter {
        Box::new(delays.map(move |delay| jitter(delay).min(cap)))
    } else {
        delays
    };
    Box::new(delays.take(max_retries as usize))
}
