//! Error types for `doorlist-xlsx`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to open workbook {path}: {source}")]
  Open {
    path:   PathBuf,
    #[source]
    source: calamine::Error,
  },

  #[error("workbook {0} has no sheets")]
  NoSheet(PathBuf),

  #[error("column numbers are 1-based, got 0")]
  ZeroColumn,

  #[error("failed to write workbook: {0}")]
  Write(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
