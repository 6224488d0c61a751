//! Error types for dataset operations.

use tabsync_exchange::ExchangeError;
use tabsync_gateway::GatewayError;
use tabsync_model::RowId;
use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors that can occur while driving a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A gateway call failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Tabular text could not be parsed.
    #[error("import error: {0}")]
    Import(#[from] ExchangeError),

    /// Save was requested while no row is being edited.
    #[error("no row is being edited")]
    NotEditing,

    /// The referenced row is not in the collection.
    #[error("row `{0}` is not in the collection")]
    UnknownRow(RowId),
}
