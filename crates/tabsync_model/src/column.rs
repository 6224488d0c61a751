//! Column descriptors.

use crate::row::FieldValue;
use serde::{Deserialize, Serialize};

/// Declared value kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Free-form text.
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// Structured JSON document.
    Json,
    /// Calendar date, carried as text on the wire.
    Date,
}

impl ColumnKind {
    /// Coerces raw cell input to this kind.
    ///
    /// Number columns parse as `f64`; input that fails to parse is kept
    /// as text so validation at the gateway boundary can report it.
    /// Json columns parse as a JSON document with the same fallback.
    /// Everything else passes through as text.
    pub fn coerce(&self, raw: &str) -> FieldValue {
        match self {
            ColumnKind::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    FieldValue::Null
                } else {
                    trimmed
                        .parse::<f64>()
                        .map(FieldValue::Number)
                        .unwrap_or_else(|_| FieldValue::Text(raw.to_string()))
                }
            }
            ColumnKind::Json => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    FieldValue::Null
                } else {
                    serde_json::from_str(trimmed)
                        .map(FieldValue::Json)
                        .unwrap_or_else(|_| FieldValue::Text(raw.to_string()))
                }
            }
            ColumnKind::Text | ColumnKind::Date => FieldValue::Text(raw.to_string()),
        }
    }
}

/// Static metadata of one column: field key, display label, value kind,
/// and whether cells are editable. Defined once per entity type and never
/// mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field key in the row.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Declared value kind.
    #[serde(default)]
    pub kind: ColumnKind,
    /// Whether cells in this column may be edited in place.
    #[serde(default = "default_editable")]
    pub editable: bool,
}

fn default_editable() -> bool {
    true
}

impl ColumnDescriptor {
    /// Creates a text column.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnKind::Text,
            editable: true,
        }
    }

    /// Creates a number column.
    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ColumnKind::Number,
            ..Self::text(key, label)
        }
    }

    /// Creates a structured-json column.
    pub fn json(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ColumnKind::Json,
            ..Self::text(key, label)
        }
    }

    /// Creates a date column.
    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ColumnKind::Date,
            ..Self::text(key, label)
        }
    }

    /// Marks the column read-only.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_coercion() {
        assert_eq!(ColumnKind::Number.coerce("2023"), FieldValue::Number(2023.0));
        assert_eq!(
            ColumnKind::Number.coerce(" 17.861 "),
            FieldValue::Number(17.861)
        );
        assert_eq!(ColumnKind::Number.coerce(""), FieldValue::Null);
        // Unparseable input is retained for validation to report.
        assert_eq!(
            ColumnKind::Number.coerce("n/a"),
            FieldValue::Text("n/a".into())
        );
    }

    #[test]
    fn json_coercion() {
        assert_eq!(
            ColumnKind::Json.coerce(r#"{"a":1}"#),
            FieldValue::Json(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            ColumnKind::Json.coerce("not json"),
            FieldValue::Text("not json".into())
        );
    }

    #[test]
    fn text_and_date_pass_through() {
        assert_eq!(
            ColumnKind::Text.coerce("2023"),
            FieldValue::Text("2023".into())
        );
        assert_eq!(
            ColumnKind::Date.coerce("2023-07-15"),
            FieldValue::Text("2023-07-15".into())
        );
    }

    #[test]
    fn descriptor_builders() {
        let col = ColumnDescriptor::number("year", "Year");
        assert_eq!(col.key, "year");
        assert_eq!(col.kind, ColumnKind::Number);
        assert!(col.editable);

        let col = ColumnDescriptor::json("details", "Details").read_only();
        assert!(!col.editable);
    }
}
