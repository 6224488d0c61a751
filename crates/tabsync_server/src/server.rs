//! Main record server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, RequestHandler};
use std::sync::Arc;
use tabsync_model::{Row, RowDraft, RowId, TableSchema};
use tabsync_protocol::{CreatePayload, DeleteResponse, ErrorBody, FetchResponse, QueryParams};

/// The record server.
///
/// Hosts any number of datasets under a common base path and dispatches
/// the REST surface onto the request handlers. It is driven in-process:
/// an HTTP front end (or a loopback client) hands requests to
/// [`handle_request`](RecordServer::handle_request) and relays the
/// status and body back.
///
/// # Example
///
/// ```
/// use tabsync_model::datasets;
/// use tabsync_server::{RecordServer, ServerConfig};
///
/// let server = RecordServer::with_datasets(ServerConfig::default(), datasets::all());
/// let (status, body) = server.handle_request("GET", "/records/journals", "", "");
/// assert_eq!(status, 200);
/// assert_eq!(body, r#"{"data":[]}"#);
/// ```
pub struct RecordServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl RecordServer {
    /// Creates a server hosting no datasets.
    pub fn new(config: ServerConfig) -> Self {
        let context = Arc::new(HandlerContext::new(config));
        let handler = RequestHandler::new(Arc::clone(&context));
        Self { handler, context }
    }

    /// Creates a server hosting the given datasets.
    pub fn with_datasets(config: ServerConfig, schemas: Vec<TableSchema>) -> Self {
        let server = Self::new(config);
        for schema in schemas {
            server.context.register(schema);
        }
        server
    }

    /// Starts hosting a dataset.
    pub fn register(&self, schema: TableSchema) {
        self.context.register(schema);
    }

    /// Number of rows a dataset currently holds.
    pub fn row_count(&self, dataset: &str) -> usize {
        self.context.row_count(dataset)
    }

    /// Inserts rows directly, bypassing the REST surface. For seeding
    /// tests and demos.
    pub fn seed(&self, dataset: &str, drafts: Vec<RowDraft>) -> ServerResult<Vec<Row>> {
        self.handler
            .handle_create(dataset, CreatePayload::Bulk(drafts))
    }

    /// Dispatches one request and returns the status and JSON body.
    ///
    /// `path` is the URL path below the host, `query` the raw query
    /// string with or without the leading `?`.
    pub fn handle_request(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
    ) -> (u16, String) {
        tracing::debug!(method, path, "record server request");
        match self.dispatch(method, path, query, body) {
            Ok((status, body)) => (status, body),
            Err(error) => {
                tracing::debug!(status = error.status(), %error, "request rejected");
                let body = ErrorBody::new(error.to_string())
                    .to_json()
                    .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
                (error.status(), body)
            }
        }
    }

    fn dispatch(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
    ) -> ServerResult<(u16, String)> {
        let dataset = self.dataset_segment(path)?;
        let query = QueryParams::parse(query);

        match method {
            "GET" => {
                let rows = self.handler.handle_fetch(&dataset, &query)?;
                Ok((200, encode(&FetchResponse::new(rows))?))
            }
            "POST" => {
                let payload = CreatePayload::from_json(body)
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                let bulk = payload.is_bulk();
                let created = self.handler.handle_create(&dataset, payload)?;
                if bulk {
                    Ok((201, encode(&created)?))
                } else {
                    Ok((201, encode(&created[0])?))
                }
            }
            "PUT" => {
                let row = decode_update(body)?;
                let updated = self.handler.handle_update(&dataset, row)?;
                Ok((200, encode(&updated)?))
            }
            "DELETE" => {
                let id = query.get("id").ok_or(ServerError::MissingId)?;
                self.handler.handle_delete(&dataset, &RowId::from(id))?;
                Ok((200, encode(&DeleteResponse::success())?))
            }
            other => Err(ServerError::InvalidRequest(format!(
                "unsupported method {other}"
            ))),
        }
    }

    /// Extracts the dataset name from `<base>/<dataset>`.
    fn dataset_segment(&self, path: &str) -> ServerResult<String> {
        let base = &self.context.config.base_path;
        let rest = path
            .strip_prefix(base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| ServerError::UnknownDataset(path.to_string()))?;

        if rest.is_empty() || rest.contains('/') {
            return Err(ServerError::UnknownDataset(path.to_string()));
        }
        Ok(rest.to_string())
    }
}

fn encode<T: serde::Serialize>(value: &T) -> ServerResult<String> {
    serde_json::to_string(value).map_err(|e| ServerError::Internal(e.to_string()))
}

/// Decodes an update body, reporting a missing id before shape errors.
fn decode_update(body: &str) -> ServerResult<Row> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    if value.get("id").and_then(|id| id.as_str()).is_none() {
        return Err(ServerError::MissingId);
    }
    serde_json::from_value(value).map_err(|e| ServerError::InvalidRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_model::{datasets, FieldValue};

    fn server() -> RecordServer {
        RecordServer::with_datasets(ServerConfig::default(), datasets::all())
    }

    fn journal_body(title: &str, doi: &str, year: u32) -> String {
        format!(r#"{{"paperTitle":"{title}","doi":"{doi}","year":{year}}}"#)
    }

    #[test]
    fn full_crud_over_the_rest_surface() {
        let server = server();

        // Create
        let (status, body) = server.handle_request(
            "POST",
            "/records/journals",
            "",
            &journal_body("X", "10.1/x", 2020),
        );
        assert_eq!(status, 201);
        let created: Row = serde_json::from_str(&body).unwrap();
        assert!(!created.id.is_provisional());

        // Fetch
        let (status, body) = server.handle_request("GET", "/records/journals", "", "");
        assert_eq!(status, 200);
        let fetched = FetchResponse::from_json(&body).unwrap();
        assert_eq!(fetched.data.len(), 1);

        // Update
        let mut row = created.clone();
        row.set("year", FieldValue::Number(2024.0));
        let (status, body) = server.handle_request(
            "PUT",
            "/records/journals",
            "",
            &serde_json::to_string(&row).unwrap(),
        );
        assert_eq!(status, 200);
        let updated: Row = serde_json::from_str(&body).unwrap();
        assert_eq!(updated.get("year"), Some(&FieldValue::Number(2024.0)));

        // Delete
        let (status, body) = server.handle_request(
            "DELETE",
            "/records/journals",
            &format!("id={}", created.id),
            "",
        );
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"success":true}"#);
        assert_eq!(server.row_count("journals"), 0);
    }

    #[test]
    fn bulk_create_returns_an_array() {
        let server = server();
        let body = format!(
            "[{},{}]",
            journal_body("X", "10.1/x", 2020),
            journal_body("Y", "10.1/y", 2021)
        );

        let (status, body) = server.handle_request("POST", "/records/journals", "", &body);
        assert_eq!(status, 201);
        let created: Vec<Row> = serde_json::from_str(&body).unwrap();
        assert_eq!(created.len(), 2);
    }

    #[test]
    fn fetch_applies_gte_filter_and_ordering() {
        let server = server();
        for (title, doi, year) in [("A", "10.1/a", 2018), ("B", "10.1/b", 2023), ("C", "10.1/c", 2021)] {
            server.handle_request("POST", "/records/journals", "", &journal_body(title, doi, year));
        }

        let (status, body) =
            server.handle_request("GET", "/records/journals", "?year_gte=2021", "");
        assert_eq!(status, 200);
        let fetched = FetchResponse::from_json(&body).unwrap();
        let years: Vec<f64> = fetched
            .data
            .iter()
            .map(|r| r.get("year").unwrap().as_number().unwrap())
            .collect();
        assert_eq!(years, vec![2023.0, 2021.0]);
    }

    #[test]
    fn update_without_id_is_a_400() {
        let server = server();
        let (status, body) =
            server.handle_request("PUT", "/records/journals", "", r#"{"year":2024}"#);
        assert_eq!(status, 400);
        assert_eq!(ErrorBody::from_json(&body).unwrap().error, "Missing id");
    }

    #[test]
    fn delete_without_id_is_a_400() {
        let server = server();
        let (status, _) = server.handle_request("DELETE", "/records/journals", "", "");
        assert_eq!(status, 400);
    }

    #[test]
    fn update_of_unknown_row_is_a_404() {
        let server = server();
        let (status, body) = server.handle_request(
            "PUT",
            "/records/journals",
            "",
            r#"{"id":"zz","paperTitle":"X","year":2024}"#,
        );
        assert_eq!(status, 404);
        assert_eq!(ErrorBody::from_json(&body).unwrap().error, "not found");
    }

    #[test]
    fn duplicate_identity_is_a_409() {
        let server = server();
        server.handle_request("POST", "/records/journals", "", &journal_body("X", "10.1/x", 2020));

        let (status, body) = server.handle_request(
            "POST",
            "/records/journals",
            "",
            &journal_body("Y", "10.1/x", 2021),
        );
        assert_eq!(status, 409);
        assert!(ErrorBody::from_json(&body).unwrap().error.contains("10.1/x"));
    }

    #[test]
    fn invalid_body_is_a_400_with_a_message() {
        let server = server();
        let (status, body) = server.handle_request(
            "POST",
            "/records/journals",
            "",
            r#"{"year":2020}"#,
        );
        assert_eq!(status, 400);
        assert!(ErrorBody::from_json(&body)
            .unwrap()
            .error
            .contains("paperTitle"));
    }

    #[test]
    fn unknown_paths_are_404s() {
        let server = server();
        for path in ["/records", "/records/", "/records/journals/extra", "/other/journals"] {
            let (status, _) = server.handle_request("GET", path, "", "");
            assert_eq!(status, 404, "{path}");
        }
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let server = server();
        let (status, _) = server.handle_request("PATCH", "/records/journals", "", "");
        assert_eq!(status, 400);
    }

    #[test]
    fn seeding_bypasses_the_wire() {
        let server = server();
        let drafts = vec![RowDraft::new()
            .with("paperTitle", FieldValue::Text("X".into()))
            .with("year", FieldValue::Number(2020.0))];
        let rows = server.seed("journals", drafts).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(server.row_count("journals"), 1);
    }
}
