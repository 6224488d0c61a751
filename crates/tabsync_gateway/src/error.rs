//! Error types for gateway operations.

use tabsync_model::ValidationError;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur on a gateway call.
///
/// Every variant is terminal for the triggering action: the gateway
/// never retries, and the caller decides what to do with local state.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// The record failed schema validation before any network call.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The network layer failed (unreachable host, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote end answered with a non-2xx status and a message,
    /// surfaced verbatim.
    #[error("remote rejection ({status}): {message}")]
    Rejection {
        /// HTTP status code.
        status: u16,
        /// Server-provided message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl GatewayError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport(message.into())
    }

    /// Creates a remote rejection.
    pub fn rejection(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Rejection {
            status,
            message: message.into(),
        }
    }

    /// True for a 404 rejection: the row was not found on update/delete.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Rejection { status: 404, .. })
    }

    /// True for a 409 rejection: a uniqueness conflict on create.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GatewayError::Rejection { status: 409, .. })
    }

    /// True when the failure never left the client.
    pub fn is_local(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_classification() {
        assert!(GatewayError::rejection(404, "not found").is_not_found());
        assert!(GatewayError::rejection(409, "duplicate doi").is_conflict());
        assert!(!GatewayError::rejection(500, "boom").is_not_found());
        assert!(!GatewayError::transport("refused").is_conflict());
    }

    #[test]
    fn validation_is_local() {
        let err = GatewayError::from(ValidationError::MissingField("id".into()));
        assert!(err.is_local());
        assert!(!GatewayError::transport("refused").is_local());
    }

    #[test]
    fn error_display() {
        let err = GatewayError::rejection(409, "duplicate value `x` for `doi`");
        let msg = err.to_string();
        assert!(msg.contains("409"));
        assert!(msg.contains("duplicate"));
    }
}
