//! Table schemas and validation.

use crate::column::{ColumnDescriptor, ColumnKind};
use crate::row::{FieldValue, Row, RowDraft};
use thiserror::Error;

/// Result type for validation.
pub type ValidationResult = Result<(), ValidationError>;

/// A record that does not satisfy its schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A field value does not match the declared column kind.
    #[error("field `{field}`: expected {expected}")]
    WrongKind {
        /// Field key.
        field: String,
        /// Description of the expected kind.
        expected: &'static str,
    },

    /// A field key the schema does not declare.
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Schema of one dataset: its columns plus the dataset-level metadata the
/// server and the exchange layer need.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Dataset name, also the final path segment of its endpoint.
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Column descriptors in declared display order.
    pub columns: Vec<ColumnDescriptor>,
    /// Keys of fields that must be non-empty.
    pub required: Vec<String>,
    /// Key of the column whose values must be unique across the dataset.
    pub identity: Option<String>,
    /// Key of the column the server orders by, descending.
    pub sort_by: Option<String>,
}

impl TableSchema {
    /// Creates a schema with the given name, title, and columns.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            columns,
            required: Vec::new(),
            identity: None,
            sort_by: None,
        }
    }

    /// Marks fields as required.
    pub fn with_required(mut self, keys: &[&str]) -> Self {
        self.required = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    /// Sets the identity column.
    pub fn with_identity(mut self, key: impl Into<String>) -> Self {
        self.identity = Some(key.into());
        self
    }

    /// Sets the default sort column.
    pub fn with_sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns the declared column keys in order.
    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    /// Validates a draft against the schema.
    ///
    /// Checks that every field key is declared, that number columns hold
    /// numbers (or nothing), and that required fields are non-empty.
    pub fn validate_draft(&self, draft: &RowDraft) -> ValidationResult {
        self.validate_fields(draft.fields.iter())
    }

    /// Validates a full row's field set against the schema.
    pub fn validate_row(&self, row: &Row) -> ValidationResult {
        self.validate_fields(row.fields.iter())
    }

    fn validate_fields<'a, I>(&self, fields: I) -> ValidationResult
    where
        I: Iterator<Item = (&'a String, &'a FieldValue)> + Clone,
    {
        for (key, value) in fields.clone() {
            let column = self
                .column(key)
                .ok_or_else(|| ValidationError::UnknownField(key.clone()))?;

            if column.kind == ColumnKind::Number
                && !value.is_empty()
                && value.as_number().is_none()
            {
                return Err(ValidationError::WrongKind {
                    field: key.clone(),
                    expected: "a number",
                });
            }
        }

        for required in &self.required {
            let present = fields
                .clone()
                .find(|(key, _)| *key == required)
                .map(|(_, value)| !value.is_empty())
                .unwrap_or(false);
            if !present {
                return Err(ValidationError::MissingField(required.clone()));
            }
        }

        Ok(())
    }
}
