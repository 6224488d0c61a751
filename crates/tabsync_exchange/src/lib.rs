//! # Tabsync Exchange
//!
//! Flat tabular import/export at the row-store boundary.
//!
//! This crate provides:
//! - CSV export of a row collection in declared column order
//! - CSV import producing row drafts with header-derived keys
//! - Per-dataset header templates for importable files
//!
//! Both directions are pure translations, decoupled from network I/O:
//! imported drafts are handed to the gateway as one bulk create, and the
//! caller observes results through the next fetch.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod csv;
mod error;

pub use csv::{export_rows, import_rows, template};
pub use error::{ExchangeError, ExchangeResult};
