//! Error type shared by the HTTP layer and station clients.

use thiserror::Error;

/// Why a single station lookup produced no payload.
///
/// Every variant is recoverable: the aggregator treats the city as absent and
/// moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider returned status '{status}': {message}")]
    Provider { status: String, message: String },
}

impl FetchError {
    /// Returns `true` for failures worth surfacing to the user.
    ///
    /// A well-formed "not ok" answer from the provider (unknown station, bad
    /// token) is dropped quietly; everything else is reported.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, FetchError::Provider { .. })
    }
}
