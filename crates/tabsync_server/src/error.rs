//! Error types for the record server.

use tabsync_model::ValidationError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while handling a request.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request body or path could not be interpreted.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Update or delete without an id.
    #[error("Missing id")]
    MissingId,

    /// The addressed row does not exist.
    #[error("not found")]
    NotFound,

    /// The path names a dataset the server does not host.
    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),

    /// A record does not satisfy the dataset schema.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A create would duplicate the dataset's identity column.
    #[error("duplicate value `{value}` for `{field}`")]
    Duplicate {
        /// Identity column key.
        field: String,
        /// Offending value.
        value: String,
    },

    /// A bulk create carried a bad row; the whole batch is rejected.
    #[error("row {index}: {message}")]
    BulkRejected {
        /// 1-based row position within the batch.
        index: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status this error answers with.
    pub fn status(&self) -> u16 {
        match self {
            ServerError::InvalidRequest(_)
            | ServerError::MissingId
            | ServerError::Validation(_)
            | ServerError::BulkRejected { .. } => 400,
            ServerError::NotFound | ServerError::UnknownDataset(_) => 404,
            ServerError::Duplicate { .. } => 409,
            ServerError::Internal(_) => 500,
        }
    }

    /// Returns true for a 4xx answer.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::MissingId.status(), 400);
        assert_eq!(ServerError::NotFound.status(), 404);
        assert_eq!(
            ServerError::Duplicate {
                field: "doi".into(),
                value: "10.1/x".into(),
            }
            .status(),
            409
        );
        assert_eq!(ServerError::Internal("boom".into()).status(), 500);
    }

    #[test]
    fn classification() {
        assert!(ServerError::MissingId.is_client_error());
        assert!(!ServerError::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn bulk_rejection_names_the_row() {
        let err = ServerError::BulkRejected {
            index: 3,
            message: "missing required field `paperTitle`".into(),
        };
        assert!(err.to_string().contains("row 3"));
    }
}
