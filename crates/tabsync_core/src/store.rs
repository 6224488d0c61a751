//! Row store: the authoritative local mirror of one dataset.

use std::sync::Arc;
use tabsync_model::{Row, RowDraft, RowId, TableSchema};

/// In-memory mirror of one dataset's collection, holding both persisted
/// and provisional rows in display order (newly added rows prepend).
///
/// The store mediates all local mutation; rows leave it only through a
/// [`load`](RowStore::load) after the server confirms a change.
#[derive(Debug)]
pub struct RowStore {
    schema: Arc<TableSchema>,
    rows: Vec<Row>,
}

impl RowStore {
    /// Creates an empty store for a dataset.
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Returns the dataset schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Replaces the entire collection. Last write wins; there is no
    /// merge logic. Used after every successful fetch.
    pub fn load(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Prepends a blank row under a fresh provisional id and returns
    /// the id. Every declared column starts as empty text.
    ///
    /// The id is unique within the store even when two inserts land on
    /// the same millisecond.
    pub fn insert_provisional(&mut self) -> RowId {
        let mut id = RowId::provisional();
        let mut bump = 1;
        while self.contains(&id) {
            id = RowId::provisional_from_millis(provisional_millis(&id) + bump);
            bump += 1;
        }

        let row = RowDraft::blank(&self.schema.columns).into_row(id.clone());
        self.rows.insert(0, row);
        id
    }

    /// Sets one field of one row, coercing the raw input to the
    /// column's declared kind.
    ///
    /// A missing row id or an undeclared column key is a silent no-op;
    /// this is a local index operation, not a remote call.
    pub fn update_field(&mut self, id: &RowId, key: &str, raw: &str) {
        let Some(column) = self.schema.column(key) else {
            return;
        };
        let value = column.kind.coerce(raw);
        if let Some(row) = self.rows.iter_mut().find(|r| &r.id == id) {
            row.set(key.to_string(), value);
        }
    }

    /// Returns true if a row with the id is present.
    pub fn contains(&self, id: &RowId) -> bool {
        self.rows.iter().any(|r| &r.id == id)
    }

    /// Looks up a row by id.
    pub fn get(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == id)
    }

    /// Returns the collection in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows, provisional included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extracts the millisecond tag of a provisional id; zero if absent.
fn provisional_millis(id: &RowId) -> u64 {
    id.as_str()
        .strip_prefix(tabsync_model::PROVISIONAL_PREFIX)
        .and_then(|tag| tag.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_model::{ColumnDescriptor, FieldValue};

    fn schema() -> Arc<TableSchema> {
        Arc::new(TableSchema::new(
            "journals",
            "Journals",
            vec![
                ColumnDescriptor::text("title", "Title"),
                ColumnDescriptor::number("year", "Year"),
            ],
        ))
    }

    fn store_with(rows: Vec<Row>) -> RowStore {
        let mut store = RowStore::new(schema());
        store.load(rows);
        store
    }

    #[test]
    fn load_replaces_in_order() {
        let rows = vec![
            Row::new("a1").with("year", FieldValue::Number(2020.0)),
            Row::new("b2").with("year", FieldValue::Number(2021.0)),
        ];
        let store = store_with(rows.clone());
        assert_eq!(store.rows(), rows.as_slice());

        let mut store = store_with(rows);
        store.load(vec![Row::new("c3")]);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&RowId::from("c3")));
    }

    #[test]
    fn insert_provisional_prepends_blank_row() {
        let mut store = store_with(vec![Row::new("a1")]);
        let id = store.insert_provisional();

        assert!(id.is_provisional());
        assert_eq!(store.rows()[0].id, id);
        assert_eq!(store.rows()[0].get("title"), Some(&FieldValue::empty()));
        assert_eq!(store.rows()[0].get("year"), Some(&FieldValue::empty()));
        assert_eq!(store.rows()[1].id, RowId::from("a1"));
    }

    #[test]
    fn consecutive_provisional_ids_are_distinct() {
        let mut store = store_with(vec![]);
        let first = store.insert_provisional();
        let second = store.insert_provisional();
        let third = store.insert_provisional();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_field_coerces_to_column_kind() {
        let mut store = store_with(vec![Row::new("a1")]);
        store.update_field(&RowId::from("a1"), "year", "2023");
        store.update_field(&RowId::from("a1"), "title", "2023");

        let row = store.get(&RowId::from("a1")).unwrap();
        assert_eq!(row.get("year"), Some(&FieldValue::Number(2023.0)));
        assert_eq!(row.get("title"), Some(&FieldValue::Text("2023".into())));
    }

    #[test]
    fn update_field_on_absent_row_is_a_no_op() {
        let mut store = store_with(vec![Row::new("a1")]);
        store.update_field(&RowId::from("zz"), "year", "2023");
        assert_eq!(store.get(&RowId::from("a1")).unwrap().get("year"), None);
    }

    #[test]
    fn update_field_on_undeclared_column_is_a_no_op() {
        let mut store = store_with(vec![Row::new("a1")]);
        store.update_field(&RowId::from("a1"), "volume", "12");
        assert_eq!(store.get(&RowId::from("a1")).unwrap().get("volume"), None);
    }
}
