//! Mapping of low-level network errors onto [`FailureKind`].
//!
//! Timeouts are recognised from reqwest's own flag. Everything else is found by
//! walking the error's source chain, first by `io::ErrorKind` and then, for
//! errors that only carry text (hyper's "connection closed before message
//! completed" and friends), by a small list of known messages.

use crate::error::{FailureKind, TransportError};
use std::error::Error;
use std::io;

/// Messages that identify a connection the peer or the OS already closed.
const CLOSED_CONNECTION_MESSAGES: &[&str] = &[
    "use of closed network connection",
    "connection closed",
    "broken pipe",
];

const RESET_CONNECTION_MESSAGES: &[&str] = &["connection reset"];

/// Returns true when `err` is worth another request.
pub fn is_retryable(err: &TransportError) -> bool {
    err.kind().is_retryable()
}

/// Classifies a reqwest error.
pub(crate) fn classify_reqwest(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        return FailureKind::Timeout;
    }
    classify_chain(err)
}

/// Classifies an arbitrary error by inspecting it and all of its sources.
///
/// Custom [`Transport`](crate::Transport) implementations use this to tag
/// their own failures the same way [`ReqwestTransport`](crate::ReqwestTransport) does.
///
/// ```
/// use refetch::{classify_chain, FailureKind, TransportError};
/// use std::io;
///
/// let cause = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
/// let kind = classify_chain(&cause);
/// assert_eq!(kind, FailureKind::ConnectionReset);
///
/// let err = TransportError::new(kind, cause);
/// assert!(refetch::is_retryable(&err));
/// ```
pub fn classify_chain(err: &(dyn Error + 'static)) -> FailureKind {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            let kind = classify_io(io_err.kind());
            if kind != FailureKind::Other {
                return kind;
            }
        }
        if let Some(kind) = classify_message(&e.to_string()) {
            return kind;
        }
        current = e.source();
    }
    FailureKind::Other
}

/// Classifies an `io::ErrorKind`.
pub(crate) fn classify_io(kind: io::ErrorKind) -> FailureKind {
    match kind {
        io::ErrorKind::TimedOut => FailureKind::Timeout,
        io::ErrorKind::ConnectionReset => FailureKind::ConnectionReset,
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::NotConnected => FailureKind::ConnectionClosed,
        _ => FailureKind::Other,
    }
}

fn classify_message(message: &str) -> Option<FailureKind> {
    let message = message.to_ascii_lowercase();
    if CLOSED_CONNECTION_MESSAGES
        .iter()
        .any(|needle| message.contains(needle))
    {
        return Some(FailureKind::ConnectionClosed);
    }
    if RESET_CONNECTION_MESSAGES
        .iter()
        .any(|needle| message.contains(needle))
    {
        return Some(FailureKind::ConnectionReset);
    }
    None
}
