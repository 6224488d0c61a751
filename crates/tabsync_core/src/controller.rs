//! Dataset controller: store + session + gateway.

use crate::config::DatasetConfig;
use crate::error::{DatasetError, DatasetResult};
use crate::session::{EditSession, EditState};
use crate::store::RowStore;
use parking_lot::RwLock;
use std::sync::Arc;
use tabsync_exchange::{export_rows, import_rows};
use tabsync_gateway::SyncGateway;
use tabsync_model::{Row, RowId, TableSchema};

/// Counters over a controller's lifetime.
#[derive(Debug, Clone, Default)]
pub struct DatasetStats {
    /// Successful fetches.
    pub fetches: u64,
    /// Successful saves (creates and updates).
    pub saves: u64,
    /// Successful deletes.
    pub deletes: u64,
    /// Successful bulk imports.
    pub imports: u64,
    /// Message of the last failed operation, cleared by the next
    /// successful refresh.
    pub last_error: Option<String>,
}

/// State container of one dataset screen.
///
/// Owns the row store and the edit session for one entity type and
/// mediates every remote round trip through the gateway. Each dataset
/// instance is independently constructed; there is no cross-dataset
/// coordination and no process-wide state.
pub struct DatasetController<G: SyncGateway> {
    schema: Arc<TableSchema>,
    config: DatasetConfig,
    gateway: G,
    store: RwLock<RowStore>,
    session: RwLock<EditSession>,
    stats: RwLock<DatasetStats>,
}

impl<G: SyncGateway> DatasetController<G> {
    /// Creates a controller for one dataset endpoint.
    pub fn new(schema: Arc<TableSchema>, config: DatasetConfig, gateway: G) -> Self {
        Self {
            store: RwLock::new(RowStore::new(Arc::clone(&schema))),
            session: RwLock::new(EditSession::new()),
            stats: RwLock::new(DatasetStats::default()),
            schema,
            config,
            gateway,
        }
    }

    /// Returns the dataset schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns a snapshot of the collection in display order, the
    /// input of a table renderer.
    pub fn rows(&self) -> Vec<Row> {
        self.store.read().rows().to_vec()
    }

    /// Returns the current edit state, the other renderer input.
    pub fn edit_state(&self) -> EditState {
        self.session.read().state().clone()
    }

    /// Returns the lifetime counters.
    pub fn stats(&self) -> DatasetStats {
        self.stats.read().clone()
    }

    /// Fetches the collection and replaces the local mirror wholesale.
    ///
    /// Runs on mount and after every save, cancel, delete, and import.
    /// An edit target that did not survive the reload is cleared.
    pub fn refresh(&self) -> DatasetResult<()> {
        let rows = self
            .gateway
            .fetch_all(&self.config.default_query)
            .map_err(|e| self.fail(e))?;
        let count = rows.len();

        {
            let mut store = self.store.write();
            store.load(rows);

            let mut session = self.session.write();
            let stale = session.target().is_some_and(|t| !store.contains(t));
            if stale {
                session.clear();
            }
        }

        let mut stats = self.stats.write();
        stats.fetches += 1;
        stats.last_error = None;
        tracing::debug!(dataset = %self.schema.name, rows = count, "collection refreshed");
        Ok(())
    }

    /// Prepends a blank provisional row and opens it for editing.
    ///
    /// Returns the provisional id. An edit already in progress is
    /// silently abandoned, as with [`begin_edit`](Self::begin_edit).
    pub fn add_row(&self) -> RowId {
        let id = self.store.write().insert_provisional();
        let abandoned = self.session.write().begin(id.clone());
        if let Some(old) = abandoned {
            tracing::debug!(dataset = %self.schema.name, abandoned = %old, "edit target switched");
        }
        id
    }

    /// Opens an existing row for editing.
    ///
    /// Beginning a new edit while another row is active silently
    /// switches the target; the abandoned id is returned so a caller
    /// may surface it. The abandoned row's unsaved field edits stay in
    /// the store until the next reload.
    pub fn begin_edit(&self, id: &RowId) -> DatasetResult<Option<RowId>> {
        if !self.store.read().contains(id) {
            return Err(DatasetError::UnknownRow(id.clone()));
        }
        Ok(self.session.write().begin(id.clone()))
    }

    /// Sets one field of one row, coercing to the declared column kind.
    /// Unknown row ids and undeclared columns are silent no-ops.
    pub fn update_field(&self, id: &RowId, key: &str, raw: &str) {
        self.store.write().update_field(id, key, raw);
    }

    /// Saves the row currently being edited.
    ///
    /// A provisional id issues exactly one create (the id never goes
    /// over the wire); a persisted id issues exactly one update with
    /// the full field set. On success the edit target is cleared and
    /// the collection reloaded; on failure the session stays in
    /// Editing and nothing is rolled back.
    pub fn save(&self) -> DatasetResult<()> {
        let target = self
            .session
            .read()
            .target()
            .cloned()
            .ok_or(DatasetError::NotEditing)?;
        let row = self
            .store
            .read()
            .get(&target)
            .cloned()
            .ok_or_else(|| DatasetError::UnknownRow(target.clone()))?;

        if target.is_provisional() {
            self.gateway.create(&row.draft()).map_err(|e| self.fail(e))?;
        } else {
            self.gateway.update(&row).map_err(|e| self.fail(e))?;
        }

        tracing::debug!(dataset = %self.schema.name, row = %target, "row saved");
        self.session.write().clear();
        self.stats.write().saves += 1;
        self.refresh()
    }

    /// Abandons the current edit and reloads server truth.
    ///
    /// In-memory field changes are discarded by the reload; a
    /// provisional row vanishes because it never reached the server.
    pub fn cancel(&self) -> DatasetResult<()> {
        self.session.write().clear();
        self.refresh()
    }

    /// Deletes a row on the server and reloads.
    ///
    /// Takes effect immediately; any confirmation step is a concern of
    /// the layer above.
    pub fn delete(&self, id: &RowId) -> DatasetResult<()> {
        self.gateway.remove(id).map_err(|e| self.fail(e))?;
        tracing::debug!(dataset = %self.schema.name, row = %id, "row deleted");
        self.stats.write().deletes += 1;
        self.refresh()
    }

    /// Imports tabular text as one bulk create, then reloads.
    ///
    /// The batch succeeds or fails as a whole; results are observed
    /// through the reload. Returns the number of rows sent.
    pub fn import_csv(&self, text: &str) -> DatasetResult<usize> {
        let drafts = import_rows(text, &self.schema.columns).map_err(|e| self.fail(e))?;
        if drafts.is_empty() {
            return Ok(0);
        }

        let count = drafts.len();
        self.gateway
            .create_bulk(&drafts)
            .map_err(|e| self.fail(e))?;
        tracing::debug!(dataset = %self.schema.name, rows = count, "bulk import sent");
        self.stats.write().imports += 1;
        self.refresh()?;
        Ok(count)
    }

    /// Exports the current collection as tabular text in declared
    /// column order.
    pub fn export_csv(&self) -> String {
        export_rows(self.store.read().rows(), &self.schema.columns)
    }

    fn fail(&self, error: impl Into<DatasetError>) -> DatasetError {
        let error = error.into();
        self.stats.write().last_error = Some(error.to_string());
        error
    }
}
