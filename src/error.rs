use std::sync::Arc;

use thiserror::Error;

/// Result type used by collaborator implementations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by collaborators (stores, renderers, review flows, launch targets).
///
/// [`Client`](crate::Client) never returns these to the host. Each one is logged and replaced by a
/// single fallback: the current time for a missing install time, the native prompt for a failed
/// in-store review, the web listing for an unhandled store URL.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The platform could not report when the application was first installed.
    #[error("first install time is unavailable")]
    InstallTimeUnavailable,

    /// The in-store review SDK is not available on this device.
    #[error("in-store review is unavailable")]
    ReviewUnavailable,

    /// The in-store review SDK failed to request or launch the review flow.
    #[error("in-store review flow failed: {0}")]
    ReviewFailed(String),

    /// Nothing on the device can open the given URL.
    #[error("no handler registered for {0}")]
    NoHandler(String),

    /// The store listing URL could not be parsed.
    #[error("invalid store url")]
    InvalidUrl(#[source] url::ParseError),

    /// The preference file exists but does not hold a valid key-value map.
    #[error("malformed preference file")]
    MalformedStore(#[source] Arc<serde_json::Error>),

    /// An I/O error.
    #[error(transparent)]
    // std::io::Error is not clonable, so we're wrapping it in an Arc.
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedStore(Arc::new(value))
    }
}
