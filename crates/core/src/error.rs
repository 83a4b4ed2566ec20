//! Gateway error model.

use thiserror::Error;

use crate::reply::ContractViolation;

/// Result type used by route handlers.
pub type HandlerResult<T> = Result<T, GatewayError>;

/// Errors a handler (or the dispatch pipeline around it) can surface.
///
/// Validation and authentication failures are not modeled here: the
/// dispatcher turns those into replies directly. Anything that does reach
/// this type is either a programming error against the reply contract or an
/// unexpected fault, and the dispatcher surfaces it as a 500 with a generic
/// message (never as a 401).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A payload was sent for a status code of the wrong family, or an
    /// unknown status code was selected.
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// Unexpected fault (store failure, hashing failure, ...).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
