//! Error types for `doorlist-core`.
//!
//! The reconciliation engine itself never fails; these errors only surface
//! when identities are parsed back from text (e.g. from a persisted row).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("reader number is empty")]
  EmptyReaderNumber,

  #[error("person number is empty")]
  EmptyPersonNumber,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
