//! HTTP transport implementation.
//!
//! The actual HTTP client is abstracted via a trait so different
//! implementations (reqwest, ureq, a browser bridge) can be plugged in;
//! [`HttpGateway`] supplies the JSON framing and the error mapping on
//! top of whichever client is provided.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::SyncGateway;
use std::sync::{Arc, RwLock};
use tabsync_model::{Row, RowDraft, RowId, TableSchema, ValidationError};
use tabsync_protocol::{DeleteResponse, ErrorBody, FetchResponse, QueryParams};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Fetch the collection.
    Get,
    /// Create one row or a batch.
    Post,
    /// Update a row.
    Put,
    /// Delete a row.
    Delete,
}

impl Method {
    /// Returns the method name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A request handed to an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Full URL including any query string.
    pub url: String,
    /// JSON body, for POST and PUT.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }

    /// Creates a PUT request with a JSON body.
    pub fn put(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            body: Some(body.into()),
        }
    }

    /// Creates a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }
}

/// A response returned by an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a 200 response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    /// Creates a response with an explicit status.
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport. Errors are
/// plain strings: whatever the underlying library reports when the
/// request never produced a response.
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the response.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// JSON-over-HTTP gateway for one dataset endpoint.
///
/// Validates records against the dataset schema before anything goes on
/// the wire, then maps the REST contract's statuses onto the gateway
/// error taxonomy.
pub struct HttpGateway<C: HttpClient> {
    /// Endpoint base URL, e.g. `https://records.example.edu/records/journals`.
    base_url: String,
    schema: Arc<TableSchema>,
    client: C,
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpGateway<C> {
    /// Creates a gateway for one dataset endpoint.
    pub fn new(base_url: impl Into<String>, schema: Arc<TableSchema>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            schema: Arc::clone(&schema),
            client,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the endpoint base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the message of the last transport failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().unwrap().clone()
    }

    fn send(&self, request: HttpRequest) -> GatewayResult<HttpResponse> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "gateway request");

        let response = self.client.execute(&request).map_err(|message| {
            *self.last_error.write().unwrap() = Some(message.clone());
            GatewayError::transport(message)
        })?;

        *self.last_error.write().unwrap() = None;

        if !response.is_success() {
            return Err(rejection_from(&response));
        }
        Ok(response)
    }

    fn require_persisted_id(&self, id: &RowId) -> GatewayResult<()> {
        if id.as_str().is_empty() || id.is_provisional() {
            return Err(ValidationError::MissingField("id".into()).into());
        }
        Ok(())
    }

    fn encode<T: serde::Serialize>(&self, value: &T) -> GatewayResult<String> {
        serde_json::to_string(value).map_err(|e| GatewayError::Protocol(e.to_string()))
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, body: &str) -> GatewayResult<T> {
        serde_json::from_str(body).map_err(|e| GatewayError::Protocol(e.to_string()))
    }
}

/// Maps a non-2xx response onto a rejection, surfacing the server's
/// message verbatim when the body carries one.
fn rejection_from(response: &HttpResponse) -> GatewayError {
    let message = ErrorBody::from_json(&response.body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            if response.body.is_empty() {
                "request failed".to_string()
            } else {
                response.body.clone()
            }
        });
    GatewayError::rejection(response.status, message)
}

impl<C: HttpClient> SyncGateway for HttpGateway<C> {
    fn fetch_all(&self, query: &QueryParams) -> GatewayResult<Vec<Row>> {
        let url = format!("{}{}", self.base_url, query.encode());
        let response = self.send(HttpRequest::get(url))?;
        let fetched: FetchResponse = self.decode(&response.body)?;
        Ok(fetched.data)
    }

    fn create(&self, draft: &RowDraft) -> GatewayResult<Row> {
        self.schema.validate_draft(draft)?;
        let body = self.encode(draft)?;
        let response = self.send(HttpRequest::post(self.base_url.clone(), body))?;
        self.decode(&response.body)
    }

    fn create_bulk(&self, drafts: &[RowDraft]) -> GatewayResult<Vec<Row>> {
        for draft in drafts {
            self.schema.validate_draft(draft)?;
        }
        let body = self.encode(&drafts)?;
        let response = self.send(HttpRequest::post(self.base_url.clone(), body))?;
        self.decode(&response.body)
    }

    fn update(&self, row: &Row) -> GatewayResult<Row> {
        self.require_persisted_id(&row.id)?;
        self.schema.validate_row(row)?;
        let body = self.encode(row)?;
        let response = self.send(HttpRequest::put(self.base_url.clone(), body))?;
        self.decode(&response.body)
    }

    fn remove(&self, id: &RowId) -> GatewayResult<()> {
        self.require_persisted_id(id)?;
        let query = QueryParams::new().with("id", id);
        let url = format!("{}{}", self.base_url, query.encode());
        let response = self.send(HttpRequest::delete(url))?;
        let _: DeleteResponse = self.decode(&response.body)?;
        Ok(())
    }
}

/// A server an in-process loopback client can route requests to.
pub trait LoopbackServer {
    /// Handles one request and returns the response.
    fn handle(&self, request: &HttpRequest) -> HttpResponse;
}

/// An HTTP client that routes requests directly to an in-process server,
/// useful for tests and demos without network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a loopback client over the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        Ok(self.server.handle(request))
    }
}
