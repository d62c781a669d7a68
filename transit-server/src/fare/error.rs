//! Road distance service errors.

use crate::error::CoreError;

/// Failure to obtain a driving distance.
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Routing service answered with a non-success status
    #[error("routing service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not match the expected shape
    #[error("malformed routing response: {0}")]
    Malformed(String),

    /// Service answered but found no route between the points
    #[error("no route: {0}")]
    NoRoute(String),
}

impl From<DistanceError> for CoreError {
    fn from(err: DistanceError) -> Self {
        CoreError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_upstream_unavailable() {
        let err: CoreError = DistanceError::Status {
            status: 503,
            message: "busy".into(),
        }
        .into();
        assert!(matches!(err, CoreError::UpstreamUnavailable(_)));
        assert!(err.to_string().contains("503"));
    }
}
