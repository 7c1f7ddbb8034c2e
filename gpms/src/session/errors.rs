//! Session error types.

use thiserror::Error;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Login payload carried neither `id` nor the `pk` fallback
    #[error("login payload has no usable user identifier")]
    MissingUserId,

    /// Login payload was not a user-shaped object
    #[error("malformed login payload: {0}")]
    MalformedPayload(String),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
