//! # Tabsync Server
//!
//! Reference in-memory REST server for the tabsync contract.
//!
//! This crate provides:
//! - A per-dataset table store issuing persisted row ids
//! - Numeric `<field>_gte` filters and default descending ordering
//! - Identity-column uniqueness with 409 on duplicates
//! - All-or-nothing bulk creates
//! - A request dispatcher mapping the REST surface onto the handlers
//!
//! The server holds everything in memory and is driven in-process; it
//! exists so clients, integration tests, and demos have a faithful
//! remote end without standing up infrastructure.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handler;
mod server;
mod table;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use server::RecordServer;
pub use table::TableStore;
