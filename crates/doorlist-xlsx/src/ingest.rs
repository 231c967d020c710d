//! Workbook → typed rows.
//!
//! Only the first sheet is read. Each row is projected onto a list of
//! 1-based column numbers, so `[2, 3, 4]` yields cells from columns B, C
//! and D in that order. Cells are coerced to [`CellValue`] here and nowhere
//! else.

use std::path::Path;

use calamine::{Data, Reader as _, open_workbook_auto};
use doorlist_core::{
  cell::CellValue,
  source::{AbiLocationRow, AuthorizationRow, PersonRow, ReaderListRow, ReaderRow},
};
use serde::Deserialize;

use crate::{Error, Result};

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Which rows and columns of a sheet feed a source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SheetLayout {
  /// Leading rows to skip (titles, headers).
  #[serde(default)]
  pub header_rows: u32,
  /// 1-based column numbers, in the field order of the target row type.
  pub columns:     Vec<u32>,
}

impl SheetLayout {
  pub fn new(columns: impl Into<Vec<u32>>) -> Self {
    Self { header_rows: 0, columns: columns.into() }
  }

  pub fn with_header_rows(mut self, n: u32) -> Self {
    self.header_rows = n;
    self
  }

  /// Reader export: number, location, name.
  pub fn readers() -> Self { Self::new([2, 3, 4]) }

  /// Employee export: number, email, last name, first name, card.
  pub fn people() -> Self { Self::new([1, 2, 3, 4, 6]) }

  /// Authorization list: hospital, name, detail, blueprint, names, names.
  pub fn authorizations() -> Self { Self::new([1, 2, 3, 4, 5, 6]) }

  /// Secondary-location export: number, location.
  pub fn abi_locations() -> Self { Self::new([2, 5]) }

  /// Reader list used for orphan discovery: number.
  pub fn reader_list() -> Self { Self::new([2]) }
}

// ─── Cells ───────────────────────────────────────────────────────────────────

fn cell_value(data: &Data) -> CellValue {
  match data {
    Data::Empty | Data::Error(_) => CellValue::Empty,
    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
      CellValue::text(s.trim())
    }
    Data::Int(n) => CellValue::Int(*n),
    Data::Float(x) => CellValue::Float(*x),
    Data::Bool(b) => CellValue::Bool(*b),
    Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
  }
}

/// Read the first sheet of `path` and project each row onto
/// `layout.columns`. Missing cells come back as [`CellValue::Empty`].
pub fn read_sheet(path: &Path, layout: &SheetLayout) -> Result<Vec<Vec<CellValue>>> {
  if layout.columns.contains(&0) {
    return Err(Error::ZeroColumn);
  }

  let open_err = |source: calamine::Error| Error::Open { path: path.to_path_buf(), source };
  let mut workbook = open_workbook_auto(path).map_err(open_err)?;
  let range = workbook
    .worksheet_range_at(0)
    .ok_or_else(|| Error::NoSheet(path.to_path_buf()))?
    .map_err(open_err)?;

  let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
    tracing::debug!(path = %path.display(), "sheet is empty");
    return Ok(Vec::new());
  };

  let rows: Vec<Vec<CellValue>> = (first_row.max(layout.header_rows)..=last_row)
    .map(|row| {
      layout
        .columns
        .iter()
        .map(|&col| range.get_value((row, col - 1)).map(cell_value).unwrap_or_default())
        .collect()
    })
    .collect();

  tracing::info!(path = %path.display(), rows = rows.len(), "read sheet");
  Ok(rows)
}

fn read_rows<T>(
  path: &Path,
  layout: &SheetLayout,
  from_cells: impl Fn(&[CellValue]) -> Option<T>,
) -> Result<Vec<T>> {
  let cells = read_sheet(path, layout)?;
  let total = cells.len();
  let rows: Vec<T> = cells.iter().filter_map(|c| from_cells(c.as_slice())).collect();
  if rows.len() < total {
    tracing::debug!(
      path = %path.display(),
      skipped = total - rows.len(),
      "skipped rows without a key"
    );
  }
  Ok(rows)
}

pub fn read_reader_rows(path: &Path, layout: &SheetLayout) -> Result<Vec<ReaderRow>> {
  read_rows(path, layout, ReaderRow::from_cells)
}

pub fn read_abi_rows(path: &Path, layout: &SheetLayout) -> Result<Vec<AbiLocationRow>> {
  read_rows(path, layout, AbiLocationRow::from_cells)
}

pub fn read_reader_list_rows(path: &Path, layout: &SheetLayout) -> Result<Vec<ReaderListRow>> {
  read_rows(path, layout, ReaderListRow::from_cells)
}

pub fn read_person_rows(path: &Path, layout: &SheetLayout) -> Result<Vec<PersonRow>> {
  read_rows(path, layout, PersonRow::from_cells)
}

pub fn read_authorization_rows(
  path: &Path,
  layout: &SheetLayout,
) -> Result<Vec<AuthorizationRow>> {
  read_rows(path, layout, AuthorizationRow::from_cells)
}
