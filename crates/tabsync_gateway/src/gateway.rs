//! The gateway trait and a recording mock.

use crate::error::{GatewayError, GatewayResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tabsync_model::{Row, RowDraft, RowId};
use tabsync_protocol::QueryParams;

/// Boundary to the remote CRUD endpoint of one entity type.
///
/// Implementations translate each intent into exactly one remote call;
/// none of them retries.
pub trait SyncGateway: Send + Sync {
    /// Fetches the complete current collection, optionally pre-filtered
    /// server-side.
    fn fetch_all(&self, query: &QueryParams) -> GatewayResult<Vec<Row>>;

    /// Creates one row from a draft. The backing store issues the id.
    fn create(&self, draft: &RowDraft) -> GatewayResult<Row>;

    /// Creates a batch of rows in a single request. The batch succeeds
    /// or fails as a whole.
    fn create_bulk(&self, drafts: &[RowDraft]) -> GatewayResult<Vec<Row>>;

    /// Updates a persisted row, transmitting the full field set.
    fn update(&self, row: &Row) -> GatewayResult<Row>;

    /// Deletes a persisted row by id.
    fn remove(&self, id: &RowId) -> GatewayResult<()>;
}

impl<G: SyncGateway + ?Sized> SyncGateway for std::sync::Arc<G> {
    fn fetch_all(&self, query: &QueryParams) -> GatewayResult<Vec<Row>> {
        (**self).fetch_all(query)
    }

    fn create(&self, draft: &RowDraft) -> GatewayResult<Row> {
        (**self).create(draft)
    }

    fn create_bulk(&self, drafts: &[RowDraft]) -> GatewayResult<Vec<Row>> {
        (**self).create_bulk(drafts)
    }

    fn update(&self, row: &Row) -> GatewayResult<Row> {
        (**self).update(row)
    }

    fn remove(&self, id: &RowId) -> GatewayResult<()> {
        (**self).remove(id)
    }
}

/// One recorded call on a [`MockGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    /// `fetch_all` was invoked.
    FetchAll,
    /// `create` was invoked with this draft.
    Create(RowDraft),
    /// `create_bulk` was invoked with this many drafts.
    CreateBulk(usize),
    /// `update` was invoked for this row id.
    Update(RowId),
    /// `remove` was invoked for this row id.
    Remove(RowId),
}

/// A scripted gateway for testing.
///
/// Fetches replay the configured row set; creates issue sequential
/// persisted ids; every call is recorded for assertions. An injected
/// error fails the next call and is then cleared.
#[derive(Debug, Default)]
pub struct MockGateway {
    fetch_rows: Mutex<Vec<Row>>,
    calls: Mutex<Vec<GatewayCall>>,
    fail_next: Mutex<Option<GatewayError>>,
    next_id: AtomicU64,
}

impl MockGateway {
    /// Creates a mock gateway with an empty collection.
    pub fn new() -> Self {
        Self {
            fetch_rows: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Sets the rows every subsequent fetch returns.
    pub fn set_fetch_rows(&self, rows: Vec<Row>) {
        *self.fetch_rows.lock().unwrap() = rows;
    }

    /// Makes the next call fail with the given error.
    pub fn fail_next(&self, error: GatewayError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// Returns the recorded calls.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Counts recorded calls matching a predicate.
    pub fn count_calls(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: GatewayCall) -> GatewayResult<()> {
        self.calls.lock().unwrap().push(call);
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        Ok(())
    }

    fn issue_id(&self) -> RowId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        RowId::from(format!("mock-{n}"))
    }
}

impl SyncGateway for MockGateway {
    fn fetch_all(&self, _query: &QueryParams) -> GatewayResult<Vec<Row>> {
        self.record(GatewayCall::FetchAll)?;
        Ok(self.fetch_rows.lock().unwrap().clone())
    }

    fn create(&self, draft: &RowDraft) -> GatewayResult<Row> {
        self.record(GatewayCall::Create(draft.clone()))?;
        Ok(draft.clone().into_row(self.issue_id()))
    }

    fn create_bulk(&self, drafts: &[RowDraft]) -> GatewayResult<Vec<Row>> {
        self.record(GatewayCall::CreateBulk(drafts.len()))?;
        Ok(drafts
            .iter()
            .map(|d| d.clone().into_row(self.issue_id()))
            .collect())
    }

    fn update(&self, row: &Row) -> GatewayResult<Row> {
        self.record(GatewayCall::Update(row.id.clone()))?;
        Ok(row.clone())
    }

    fn remove(&self, id: &RowId) -> GatewayResult<()> {
        self.record(GatewayCall::Remove(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_model::FieldValue;

    #[test]
    fn mock_records_calls() {
        let gateway = MockGateway::new();
        gateway.fetch_all(&QueryParams::new()).unwrap();
        gateway
            .remove(&RowId::from("a1"))
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::FetchAll, GatewayCall::Remove(RowId::from("a1"))]
        );
    }

    #[test]
    fn mock_replays_fetch_rows() {
        let gateway = MockGateway::new();
        gateway.set_fetch_rows(vec![Row::new("a1")]);

        let rows = gateway.fetch_all(&QueryParams::new()).unwrap();
        assert_eq!(rows.len(), 1);
        let rows = gateway.fetch_all(&QueryParams::new()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn mock_create_issues_persisted_ids() {
        let gateway = MockGateway::new();
        let draft = RowDraft::new().with("year", FieldValue::Number(2023.0));

        let row = gateway.create(&draft).unwrap();
        assert!(!row.id.is_provisional());
        assert_eq!(row.get("year"), Some(&FieldValue::Number(2023.0)));
    }

    #[test]
    fn injected_error_fails_one_call() {
        let gateway = MockGateway::new();
        gateway.fail_next(GatewayError::transport("unreachable"));

        assert!(gateway.fetch_all(&QueryParams::new()).is_err());
        assert!(gateway.fetch_all(&QueryParams::new()).is_ok());
    }
}
