//! Rows and row identifiers.

use crate::column::ColumnDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix marking a client-generated identifier for a row the backing
/// store has not confirmed yet.
pub const PROVISIONAL_PREFIX: &str = "__new__-";

/// Identifier of a row.
///
/// Two namespaces share this type: *persisted* ids are opaque strings
/// issued by the backing store, *provisional* ids are generated locally
/// and carry [`PROVISIONAL_PREFIX`] so the two are always distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates a new provisional id tagged with the current wall-clock
    /// time in milliseconds.
    pub fn provisional() -> Self {
        Self::provisional_from_millis(now_millis())
    }

    /// Creates a provisional id from an explicit millisecond tag.
    pub fn provisional_from_millis(millis: u64) -> Self {
        RowId(format!("{PROVISIONAL_PREFIX}{millis}"))
    }

    /// Returns true if this id has not been issued by the backing store.
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        RowId(value)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId(value.to_string())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A scalar cell value.
///
/// The wire shape is plain JSON: null, a number, a string, or (for
/// structured-json columns) an arbitrary JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent value.
    Null,
    /// Numeric value.
    Number(f64),
    /// Text value. Date columns also carry their values as text.
    Text(String),
    /// Structured JSON value.
    Json(serde_json::Value),
}

impl FieldValue {
    /// Creates an empty text value, the state of a freshly added cell.
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    /// Returns true for null and for empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value for display and tabular export.
    ///
    /// Null renders as the empty string, integral numbers without a
    /// trailing `.0`, and structured JSON in its compact textual form.
    pub fn to_display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Json(v) => serde_json::to_string(v).unwrap_or_default(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Null
    }
}

/// Formats a number as plain decimal, dropping the fraction when integral.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One record of a dataset, keyed by id.
///
/// Serializes to a flat JSON object: the id alongside the fields, the
/// shape the REST contract speaks on fetch and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique row identifier.
    pub id: RowId,
    /// Field name to value.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Row {
    /// Creates a row with the given id and no fields.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Sets a field value, returning the row for chaining.
    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Sets a field value in place.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    /// Returns the field set without the id.
    ///
    /// This is the payload of a create call: the backing store issues
    /// the real id, so a provisional id never goes over the wire.
    pub fn draft(&self) -> RowDraft {
        RowDraft {
            fields: self.fields.clone(),
        }
    }
}

/// A row-shaped record without an id.
///
/// Drafts are what create calls transmit and what tabular import yields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowDraft {
    /// Field name to value.
    pub fields: BTreeMap<String, FieldValue>,
}

impl RowDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft with every declared column set to empty text,
    /// the state of a freshly added blank row.
    pub fn blank(columns: &[ColumnDescriptor]) -> Self {
        let fields = columns
            .iter()
            .map(|c| (c.key.clone(), FieldValue::empty()))
            .collect();
        Self { fields }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Sets a field value, returning the draft for chaining.
    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Attaches an id, producing a full row.
    pub fn into_row(self, id: impl Into<RowId>) -> Row {
        Row {
            id: id.into(),
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;

    #[test]
    fn provisional_ids_are_recognizable() {
        let id = RowId::provisional();
        assert!(id.is_provisional());
        assert!(id.as_str().starts_with("__new__-"));

        let persisted = RowId::from("a1");
        assert!(!persisted.is_provisional());
    }

    #[test]
    fn provisional_id_format() {
        let id = RowId::provisional_from_millis(1700000000000);
        assert_eq!(id.as_str(), "__new__-1700000000000");
    }

    #[test]
    fn field_value_display() {
        assert_eq!(FieldValue::Null.to_display(), "");
        assert_eq!(FieldValue::Number(2020.0).to_display(), "2020");
        assert_eq!(FieldValue::Number(17.861).to_display(), "17.861");
        assert_eq!(FieldValue::Text("X".into()).to_display(), "X");
        assert_eq!(
            FieldValue::Json(serde_json::json!({"a": 1})).to_display(),
            "{\"a\":1}"
        );
    }

    #[test]
    fn field_value_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::empty().is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Text("x".into()).is_empty());
    }

    #[test]
    fn row_serializes_flat() {
        let row = Row::new("a1")
            .with("year", FieldValue::Number(2020.0))
            .with("title", FieldValue::Text("X".into()));

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["year"], 2020.0);
        assert_eq!(json["title"], "X");
    }

    #[test]
    fn row_deserializes_flat() {
        let row: Row =
            serde_json::from_str(r#"{"id":"b2","year":2023,"title":"Y"}"#).unwrap();
        assert_eq!(row.id, RowId::from("b2"));
        assert_eq!(row.get("year"), Some(&FieldValue::Number(2023.0)));
        assert_eq!(row.get("title"), Some(&FieldValue::Text("Y".into())));
    }

    #[test]
    fn draft_strips_id() {
        let row = Row::new("__new__-1").with("year", FieldValue::Number(2023.0));
        let draft = row.draft();
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["year"], 2023.0);
    }

    #[test]
    fn blank_draft_covers_all_columns() {
        let columns = vec![
            ColumnDescriptor::text("title", "Title"),
            ColumnDescriptor::number("year", "Year"),
        ];
        let draft = RowDraft::blank(&columns);
        assert_eq!(draft.get("title"), Some(&FieldValue::empty()));
        assert_eq!(draft.get("year"), Some(&FieldValue::empty()));
    }
}
