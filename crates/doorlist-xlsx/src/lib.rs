//! Spreadsheet ingestion and report export for Doorlist.
//!
//! [`ingest`] turns workbook rows into the typed source rows
//! [`doorlist_core`] consumes; [`export`] writes stored records back out as
//! workbooks. Pure synchronous; no database dependencies.

pub mod error;
pub mod export;
pub mod ingest;

pub use error::{Error, Result};
pub use ingest::SheetLayout;
