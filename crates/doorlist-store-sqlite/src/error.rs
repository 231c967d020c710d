//! Error type for `doorlist-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A stored key failed to parse back into a domain identity.
  #[error("core error: {0}")]
  Core(#[from] doorlist_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("invalid blueprint stored for reader {0}")]
  InvalidBlueprint(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
