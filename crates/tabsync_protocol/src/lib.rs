//! # Tabsync Protocol
//!
//! JSON wire messages and query encoding for the tabsync REST contract.
//!
//! Per entity type the contract is:
//! - `GET <base>?<filters>` returns `{"data": [Row, ...]}`
//! - `POST <base>` takes a single row draft or an array of drafts (bulk)
//! - `PUT <base>` takes `{id, ...fields}`
//! - `DELETE <base>?id=<id>` returns `{"success": true}`
//!
//! Failures carry `{"error": "message"}` with a 4xx/5xx status.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod messages;
mod query;

pub use messages::{CreatePayload, DeleteResponse, ErrorBody, FetchResponse, ProtocolError};
pub use query::{QueryParams, GTE_SUFFIX};
