//! Typed source rows, one struct per enrichment stage.
//!
//! Each row is built from a positional slice of cells, in the column order
//! the ingestion layout projects. A row whose key field is blank yields
//! `None` and is skipped by the caller.

use serde::{Deserialize, Serialize};

use crate::{
  cell::CellValue,
  person::{Person, PersonNumber},
  reader::ReaderNumber,
};

fn cell(cells: &[CellValue], i: usize) -> CellValue {
  cells.get(i).cloned().unwrap_or_default().trimmed()
}

fn text(cells: &[CellValue], i: usize) -> Option<String> { cell(cells, i).as_text() }

/// Seed source: `(reader_number, raw_location, location_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderRow {
  pub reader_number: ReaderNumber,
  /// Left un-normalized; the seed stage runs the normalizer.
  pub raw_location:  CellValue,
  pub location_name: Option<String>,
}

impl ReaderRow {
  pub fn from_cells(cells: &[CellValue]) -> Option<Self> {
    Some(Self {
      reader_number: ReaderNumber::from_cell(&cell(cells, 0))?,
      raw_location:  cell(cells, 1),
      location_name: text(cells, 2),
    })
  }
}

/// Secondary-location source: `(reader_number, abi_location)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiLocationRow {
  pub reader_number: ReaderNumber,
  pub abi_location:  Option<String>,
}

impl AbiLocationRow {
  pub fn from_cells(cells: &[CellValue]) -> Option<Self> {
    Some(Self {
      reader_number: ReaderNumber::from_cell(&cell(cells, 0))?,
      abi_location:  text(cells, 1),
    })
  }
}

/// Orphan-discovery source: a bare list of reader numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderListRow {
  pub reader_number: ReaderNumber,
}

impl ReaderListRow {
  pub fn from_cells(cells: &[CellValue]) -> Option<Self> {
    Some(Self { reader_number: ReaderNumber::from_cell(&cell(cells, 0))? })
  }
}

/// Roster source: `(person_number, email, last_name, first_name, card_number)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
  pub person_number: PersonNumber,
  pub email:         Option<String>,
  pub last_name:     Option<String>,
  pub first_name:    Option<String>,
  pub card_number:   Option<String>,
}

impl PersonRow {
  pub fn from_cells(cells: &[CellValue]) -> Option<Self> {
    Some(Self {
      person_number: PersonNumber::from_cell(&cell(cells, 0))?,
      email:         text(cells, 1),
      last_name:     text(cells, 2),
      first_name:    text(cells, 3),
      card_number:   text(cells, 4),
    })
  }
}

impl From<PersonRow> for Person {
  fn from(row: PersonRow) -> Self {
    Person {
      person_number: row.person_number,
      first_name:    row.first_name,
      last_name:     row.last_name,
      card_number:   row.card_number,
      email:         row.email,
    }
  }
}

/// Authorization source:
/// `(hospital, name, detail, raw_blueprint, names_1, names_2)`.
///
/// Every field is optional; a row with no usable blueprint simply matches no
/// reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRow {
  pub hospital:      Option<String>,
  pub name:          Option<String>,
  pub detail:        Option<String>,
  pub raw_blueprint: CellValue,
  pub names_1:       Option<String>,
  pub names_2:       Option<String>,
}

impl AuthorizationRow {
  pub fn from_cells(cells: &[CellValue]) -> Option<Self> {
    let row = Self {
      hospital:      text(cells, 0),
      name:          text(cells, 1),
      detail:        text(cells, 2),
      raw_blueprint: cell(cells, 3),
      names_1:       text(cells, 4),
      names_2:       text(cells, 5),
    };
    (row != Self::default()).then_some(row)
  }

  /// Both personnel-name fields, in column order.
  pub fn name_fields(&self) -> [Option<&str>; 2] {
    [self.names_1.as_deref(), self.names_2.as_deref()]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reader_row_requires_a_number() {
    assert!(ReaderRow::from_cells(&[CellValue::Empty, "A-PR-500".into()]).is_none());
    let row = ReaderRow::from_cells(&[CellValue::Int(12), " a-pr-500 ".into(), "Room 5".into()])
      .unwrap();
    assert_eq!(row.reader_number.as_str(), "00012");
    assert_eq!(row.raw_location, CellValue::text("a-pr-500"));
    assert_eq!(row.location_name.as_deref(), Some("Room 5"));
  }

  #[test]
  fn short_rows_fill_with_blanks() {
    let row = PersonRow::from_cells(&[CellValue::Float(1.0)]).unwrap();
    assert_eq!(row.person_number.as_str(), "1");
    assert!(row.email.is_none());
    assert!(row.card_number.is_none());
  }

  #[test]
  fn person_row_column_order() {
    let row = PersonRow::from_cells(&[
      "1".into(),
      "x@y.com".into(),
      "Novak".into(),
      "Jan".into(),
      "C1".into(),
    ])
    .unwrap();
    let person = Person::from(row);
    assert_eq!(person.first_name.as_deref(), Some("Jan"));
    assert_eq!(person.last_name.as_deref(), Some("Novak"));
    assert_eq!(person.email.as_deref(), Some("x@y.com"));
    assert_eq!(person.card_number.as_deref(), Some("C1"));
  }

  #[test]
  fn blank_authorization_row_is_skipped() {
    assert!(AuthorizationRow::from_cells(&vec![CellValue::Empty; 6]).is_none());
    assert!(AuthorizationRow::from_cells(&[]).is_none());
    let row = AuthorizationRow::from_cells(&[
      "H1".into(),
      "Room 5".into(),
      CellValue::Empty,
      "A-PR.500".into(),
      "jan novak".into(),
    ])
    .unwrap();
    assert_eq!(row.name_fields(), [Some("jan novak"), None]);
  }
}
