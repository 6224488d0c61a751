//! # Tabsync Gateway
//!
//! Remote CRUD gateway abstraction and HTTP transport for tabsync.
//!
//! This crate provides:
//! - The [`SyncGateway`] trait: the four remote operations one dataset
//!   endpoint supports (fetch, create, update, delete), plus bulk create
//! - Schema validation at the gateway boundary, before any network call
//! - An HTTP client abstraction with a JSON-over-HTTP gateway on top
//! - A loopback client for wiring a gateway to an in-process server
//! - A mock gateway with call recording for tests
//!
//! ## Key invariants
//!
//! - A create call never transmits a provisional id
//! - An update or delete call requires a persisted id
//! - Errors are terminal for the triggering action: no retry, and local
//!   state is left for the caller to reconcile

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gateway;
mod http;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{GatewayCall, MockGateway, SyncGateway};
pub use http::{
    HttpClient, HttpGateway, HttpRequest, HttpResponse, LoopbackClient, LoopbackServer, Method,
};
