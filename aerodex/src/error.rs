//! Error types for page fetches and the pager driver.

use thiserror::Error;

/// Failure reported by a [`PageSource`](crate::PageSource).
///
/// Every variant is transient from the controller's point of view: the pager
/// records it in its `error` flag, keeps the items it already has, and accepts
/// the next action as usual. An empty page is *not* an error; it is the
/// end-of-data signal.
///
/// # Example
///
/// ```
/// # use aerodex::FetchError;
/// let err = FetchError::Status { status: 503 };
/// assert!(err.is_retryable());
/// assert_eq!(err.to_string(), "unexpected status 503");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The lookup service answered with a non-success status.
    #[error("unexpected status {status}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
    },

    /// The response body was not a list of records.
    #[error("could not decode page: {0}")]
    Decode(String),
}

impl FetchError {
    /// Create a transport error from any message.
    #[inline]
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a decode error from any message.
    #[inline]
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Transport failures and 5xx/429 statuses are retryable; a body that does
    /// not decode, or a 4xx status, will fail the same way again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status } => *status >= 500 || *status == 429,
            Self::Decode(_) => false,
        }
    }
}

/// Failure talking to a running pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PagerError {
    /// The driver task has stopped; no further actions are accepted.
    #[error("pager driver has shut down")]
    Closed,

    /// The debounced input that should have started a query did not run to
    /// completion.
    #[error(transparent)]
    Input(#[from] InvocationError),
}

/// Why a [`Debounced`](crate::Debounced) call produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvocationError {
    /// A newer call replaced this one before its window elapsed, or the
    /// schedule was cancelled.
    #[error("debounced call was superseded")]
    Superseded,

    /// The callback panicked while running.
    #[error("debounced callback panicked")]
    Panicked,
}
