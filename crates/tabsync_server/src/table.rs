//! Per-dataset table store.

use crate::error::{ServerError, ServerResult};
use std::cmp::Ordering;
use std::collections::HashSet;
use tabsync_model::{Row, RowDraft, RowId, TableSchema};
use tabsync_protocol::{QueryParams, GTE_SUFFIX};
use uuid::Uuid;

/// In-memory backing store for one dataset.
///
/// Issues persisted ids, enforces the schema and the identity column,
/// and answers filtered, ordered listings.
#[derive(Debug)]
pub struct TableStore {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl TableStore {
    /// Creates an empty store for a dataset.
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Returns the dataset schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no rows are held.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lists rows matching the filters, ordered by the schema's sort
    /// column descending (rows without it keep insertion order, last).
    ///
    /// A `<field>_gte=<n>` parameter keeps rows whose numeric `field`
    /// is at least `n`; any other parameter is an exact match on the
    /// field's display value.
    pub fn list(&self, query: &QueryParams) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| matches_filters(row, query))
            .cloned()
            .collect();

        if let Some(sort_key) = &self.schema.sort_by {
            rows.sort_by(|a, b| {
                let a_key = a.get(sort_key).and_then(|v| v.as_number());
                let b_key = b.get(sort_key).and_then(|v| v.as_number());
                match (a_key, b_key) {
                    (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }

        rows
    }

    /// Inserts one draft, issuing a persisted id.
    pub fn insert(&mut self, draft: RowDraft) -> ServerResult<Row> {
        self.schema.validate_draft(&draft)?;
        if let Some((field, value)) = self.identity_conflict(None, &draft) {
            return Err(ServerError::Duplicate { field, value });
        }

        let row = draft.into_row(issue_id());
        self.rows.push(row.clone());
        Ok(row)
    }

    /// Inserts a batch, all-or-nothing.
    ///
    /// Every draft is checked before any row lands: one bad record
    /// rejects the whole batch, naming its position, and the store is
    /// left untouched.
    pub fn insert_bulk(&mut self, drafts: Vec<RowDraft>) -> ServerResult<Vec<Row>> {
        let mut seen: HashSet<String> = HashSet::new();
        for (index, draft) in drafts.iter().enumerate() {
            self.schema
                .validate_draft(draft)
                .map_err(|e| ServerError::BulkRejected {
                    index: index + 1,
                    message: e.to_string(),
                })?;

            if let Some((field, value)) = self.identity_conflict(None, draft) {
                return Err(ServerError::Duplicate { field, value });
            }
            if let Some(key) = &self.schema.identity {
                if let Some(value) = draft.get(key).filter(|v| !v.is_empty()) {
                    if !seen.insert(value.to_display()) {
                        return Err(ServerError::Duplicate {
                            field: key.clone(),
                            value: value.to_display(),
                        });
                    }
                }
            }
        }

        let rows: Vec<Row> = drafts
            .into_iter()
            .map(|draft| draft.into_row(issue_id()))
            .collect();
        self.rows.extend(rows.iter().cloned());
        Ok(rows)
    }

    /// Replaces a row's field set. The full field set is transmitted,
    /// not a diff.
    pub fn update(&mut self, row: Row) -> ServerResult<Row> {
        let position = self
            .rows
            .iter()
            .position(|r| r.id == row.id)
            .ok_or(ServerError::NotFound)?;

        self.schema.validate_row(&row)?;
        if let Some((field, value)) = self.identity_conflict(Some(&row.id), &row.draft()) {
            return Err(ServerError::Duplicate { field, value });
        }

        self.rows[position].fields = row.fields;
        Ok(self.rows[position].clone())
    }

    /// Removes a row by id.
    pub fn remove(&mut self, id: &RowId) -> ServerResult<()> {
        let position = self
            .rows
            .iter()
            .position(|r| &r.id == id)
            .ok_or(ServerError::NotFound)?;
        self.rows.remove(position);
        Ok(())
    }

    /// Finds a non-empty identity value already taken by another row.
    fn identity_conflict(
        &self,
        exclude: Option<&RowId>,
        draft: &RowDraft,
    ) -> Option<(String, String)> {
        let key = self.schema.identity.as_ref()?;
        let value = draft.get(key).filter(|v| !v.is_empty())?;
        let rendered = value.to_display();

        let taken = self.rows.iter().any(|row| {
            exclude != Some(&row.id)
                && row
                    .get(key)
                    .map(|v| v.to_display() == rendered)
                    .unwrap_or(false)
        });
        taken.then(|| (key.clone(), rendered))
    }
}

fn issue_id() -> RowId {
    RowId::from(Uuid::new_v4().to_string())
}

fn matches_filters(row: &Row, query: &QueryParams) -> bool {
    query.pairs().iter().all(|(key, value)| {
        if let Some(field) = key.strip_suffix(GTE_SUFFIX) {
            let Ok(threshold) = value.parse::<f64>() else {
                // An unparseable threshold filters nothing.
                return true;
            };
            return row
                .get(field)
                .and_then(|v| v.as_number())
                .map(|n| n >= threshold)
                .unwrap_or(false);
        }

        row.get(key)
            .map(|v| v.to_display() == *value)
            .unwrap_or(false)
    })
}
