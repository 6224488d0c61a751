//! # Tabsync Model
//!
//! Row, column, and schema types for tabsync.
//!
//! This crate provides:
//! - Row identifiers with persisted and provisional namespaces
//! - Dynamic field values (text, number, structured JSON, date)
//! - Column descriptors and per-dataset table schemas
//! - Schema validation for drafts and rows
//! - The built-in dataset catalog for research-records applications

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod column;
pub mod datasets;
mod row;
mod schema;

pub use column::{ColumnDescriptor, ColumnKind};
pub use row::{FieldValue, Row, RowDraft, RowId, PROVISIONAL_PREFIX};
pub use schema::{TableSchema, ValidationError, ValidationResult};
