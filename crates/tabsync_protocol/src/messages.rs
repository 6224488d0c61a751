//! Protocol messages for the REST contract.

use serde::{Deserialize, Serialize};
use tabsync_model::{Row, RowDraft};
use thiserror::Error;

/// A wire body that could not be encoded or decoded.
#[derive(Error, Debug)]
#[error("malformed body: {0}")]
pub struct ProtocolError(#[from] serde_json::Error);

/// Successful fetch body: the complete current collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Rows of the collection, in server order.
    pub data: Vec<Row>,
}

impl FetchResponse {
    /// Creates a fetch response.
    pub fn new(data: Vec<Row>) -> Self {
        Self { data }
    }

    /// Encodes to JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes from JSON.
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Body of a create call: one draft, or an array of drafts for bulk
/// import. The two shapes share the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatePayload {
    /// A single row draft.
    Single(RowDraft),
    /// A batch of row drafts.
    Bulk(Vec<RowDraft>),
}

impl CreatePayload {
    /// Number of drafts carried.
    pub fn len(&self) -> usize {
        match self {
            CreatePayload::Single(_) => 1,
            CreatePayload::Bulk(drafts) => drafts.len(),
        }
    }

    /// Returns true if no drafts are carried.
    pub fn is_empty(&self) -> bool {
        matches!(self, CreatePayload::Bulk(drafts) if drafts.is_empty())
    }

    /// Returns true for the bulk shape.
    pub fn is_bulk(&self) -> bool {
        matches!(self, CreatePayload::Bulk(_))
    }

    /// Encodes to JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes from JSON.
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Successful delete body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always true on the success path.
    pub success: bool,
}

impl DeleteResponse {
    /// Creates a successful delete response.
    pub fn success() -> Self {
        Self { success: true }
    }

    /// Encodes to JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes from JSON.
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Error body carried on any non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message, surfaced verbatim to the operator.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Encodes to JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes from JSON.
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_model::FieldValue;

    #[test]
    fn fetch_response_roundtrip() {
        let resp = FetchResponse::new(vec![
            Row::new("a1").with("year", FieldValue::Number(2020.0))
        ]);
        let json = resp.to_json().unwrap();
        let decoded = FetchResponse::from_json(&json).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn fetch_response_wire_shape() {
        let decoded =
            FetchResponse::from_json(r#"{"data":[{"id":"a1","year":2020}]}"#).unwrap();
        assert_eq!(decoded.data.len(), 1);
        assert_eq!(decoded.data[0].id.as_str(), "a1");
    }

    #[test]
    fn create_payload_single() {
        let payload =
            CreatePayload::from_json(r#"{"year":2023,"paperTitle":"X"}"#).unwrap();
        assert!(!payload.is_bulk());
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn create_payload_bulk() {
        let payload =
            CreatePayload::from_json(r#"[{"year":2023},{"year":2024}]"#).unwrap();
        assert!(payload.is_bulk());
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn create_payload_empty_bulk() {
        let payload = CreatePayload::from_json("[]").unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn delete_response_shape() {
        let json = DeleteResponse::success().to_json().unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn error_body_roundtrip() {
        let body = ErrorBody::new("Missing id");
        let decoded = ErrorBody::from_json(&body.to_json().unwrap()).unwrap();
        assert_eq!(decoded.error, "Missing id");
    }
}
