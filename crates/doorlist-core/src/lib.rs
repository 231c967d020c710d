//! Core types and reconciliation engine for the Doorlist access model.
//!
//! This crate is free of spreadsheet and database dependencies. Ingestion
//! hands it typed rows; persistence consumes its output through
//! [`store::AccessStore`].
//!
//! The engine runs in a fixed order: seed readers, attach secondary
//! locations, discover orphan readers, then resolve authorizations. See
//! [`pipeline::reconcile`].

pub mod cell;
pub mod enrich;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod person;
pub mod pipeline;
pub mod reader;
pub mod registry;
pub mod resolve;
pub mod roster;
pub mod source;
pub mod store;

pub use error::{Error, Result};
