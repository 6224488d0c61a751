//! # Tabsync Core
//!
//! Row store, edit session state machine, and dataset controller.
//!
//! This crate provides:
//! - The row store: the authoritative local mirror of one dataset
//! - The edit session: single-row-at-a-time edit state machine
//! - The dataset controller tying store + session + gateway together
//! - Tabular import/export wired through the gateway
//!
//! ## Architecture
//!
//! Each dataset screen owns one independently constructed
//! [`DatasetController`]; there is no process-wide state. The controller
//! mediates every local mutation and every remote round trip:
//!
//! 1. A fetch replaces the whole collection (full refresh, not patches)
//! 2. At most one row is editable at a time
//! 3. Saving a provisional row issues a create, a persisted row an update
//! 4. Save, cancel, and delete all end in a full refresh
//!
//! ## Key invariants
//!
//! - The edit target, if set, references a row present in the collection
//! - A provisional id never goes over the wire
//! - Errors are terminal: nothing is retried or rolled back automatically

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod session;
mod store;

pub use config::DatasetConfig;
pub use controller::{DatasetController, DatasetStats};
pub use error::{DatasetError, DatasetResult};
pub use session::{EditSession, EditState};
pub use store::RowStore;
