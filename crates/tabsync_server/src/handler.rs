//! Request handlers for the dataset endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::table::TableStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tabsync_model::{Row, RowId, TableSchema};
use tabsync_protocol::{CreatePayload, QueryParams};

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Hosted datasets by name.
    tables: RwLock<HashMap<String, TableStore>>,
}

impl HandlerContext {
    /// Creates a context hosting no datasets.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Starts hosting a dataset. Replaces any previous table of the
    /// same name.
    pub fn register(&self, schema: TableSchema) {
        let name = schema.name.clone();
        self.tables.write().insert(name, TableStore::new(schema));
    }

    /// Returns the hosted dataset names.
    pub fn dataset_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Number of rows a dataset currently holds.
    pub fn row_count(&self, dataset: &str) -> usize {
        self.tables
            .read()
            .get(dataset)
            .map(|t| t.len())
            .unwrap_or(0)
    }

    fn with_table<T>(
        &self,
        dataset: &str,
        f: impl FnOnce(&mut TableStore) -> ServerResult<T>,
    ) -> ServerResult<T> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(dataset)
            .ok_or_else(|| ServerError::UnknownDataset(dataset.to_string()))?;
        f(table)
    }
}

/// Handler translating each endpoint operation onto the table store.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a handler over a context.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// `GET <base>/<dataset>?<filters>`
    pub fn handle_fetch(&self, dataset: &str, query: &QueryParams) -> ServerResult<Vec<Row>> {
        self.context.with_table(dataset, |table| Ok(table.list(query)))
    }

    /// `POST <base>/<dataset>` with one draft or a batch.
    pub fn handle_create(
        &self,
        dataset: &str,
        payload: CreatePayload,
    ) -> ServerResult<Vec<Row>> {
        let max = self.context.config.max_bulk_rows;
        if payload.len() > max {
            return Err(ServerError::InvalidRequest(format!(
                "too many rows: {} > {max}",
                payload.len()
            )));
        }

        self.context.with_table(dataset, |table| match payload {
            CreatePayload::Single(draft) => Ok(vec![table.insert(draft)?]),
            CreatePayload::Bulk(drafts) => table.insert_bulk(drafts),
        })
    }

    /// `PUT <base>/<dataset>` with `{id, ...fields}`.
    pub fn handle_update(&self, dataset: &str, row: Row) -> ServerResult<Row> {
        self.context.with_table(dataset, |table| table.update(row))
    }

    /// `DELETE <base>/<dataset>?id=<id>`
    pub fn handle_delete(&self, dataset: &str, id: &RowId) -> ServerResult<()> {
        self.context.with_table(dataset, |table| table.remove(id))
    }
}
