//! Error types for tabular exchange.

use thiserror::Error;

/// Result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Errors that can occur while parsing tabular text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The input has no header line.
    #[error("empty input: no header line")]
    EmptyInput,

    /// A quoted field never closes.
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote {
        /// 1-based line number where the field starts.
        line: usize,
    },

    /// A record's field count does not match the header.
    #[error("record {record}: expected {expected} fields, got {actual}")]
    FieldCountMismatch {
        /// 1-based record number, headers excluded.
        record: usize,
        /// Header field count.
        expected: usize,
        /// Observed field count.
        actual: usize,
    },
}
