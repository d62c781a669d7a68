//! Error taxonomy shared by every query operation.

use crate::domain::DomainError;
use crate::schedule::StoreError;

/// Failure of a core query.
///
/// Operations either produce a complete result or one of these; nothing is
/// partially applied.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    /// A referenced stop, bus or trip does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed or out-of-range input, rejected before computation
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required external service failed or was unreachable
    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Unexpected failure, e.g. inconsistent schedule data
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Internal(err.to_string())
    }
}
