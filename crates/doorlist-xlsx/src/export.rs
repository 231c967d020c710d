//! Stored records → report workbooks.
//!
//! Each report is first assembled as plain [`Report`] rows, then written
//! with [`write_report`]. Every cell is written as text so zero-padded
//! reader numbers keep their padding.

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use doorlist_core::{
  person::{Person, PersonNumber},
  reader::{Reader, ReaderNumber},
  store::Authorization,
};
use rust_xlsxwriter::{Format, Workbook};

use crate::Result;

/// A header plus rows of optional text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
  pub header: Vec<&'static str>,
  pub rows:   Vec<Vec<Option<String>>>,
}

const PERSON_HEADER: [&str; 5] = ["Person Number", "First Name", "Last Name", "Card Number", "Email"];

const READER_HEADER: [&str; 5] = [
  "Reader Number",
  "Location Blueprint",
  "Location Hospital",
  "Location Name",
  "ABI Location",
];

fn person_cells(p: &Person) -> [Option<String>; 5] {
  [
    Some(p.person_number.to_string()),
    p.first_name.clone(),
    p.last_name.clone(),
    p.card_number.clone(),
    p.email.clone(),
  ]
}

fn reader_cells(r: &Reader) -> [Option<String>; 5] {
  [
    Some(r.reader_number.to_string()),
    r.location_blueprint.as_ref().map(ToString::to_string),
    r.location_hospital.clone(),
    r.location_name.clone(),
    r.abi_location.clone(),
  ]
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// One row per authorization edge, followed by one row for every reader
/// that has no edge at all (person columns left blank).
pub fn authorizations_report(
  people: &[Person],
  readers: &[Reader],
  authorizations: &[Authorization],
) -> Report {
  let people_by_number: HashMap<&PersonNumber, &Person> =
    people.iter().map(|p| (&p.person_number, p)).collect();
  let readers_by_number: HashMap<&ReaderNumber, &Reader> =
    readers.iter().map(|r| (&r.reader_number, r)).collect();

  let mut rows: Vec<Vec<Option<String>>> = Vec::with_capacity(authorizations.len());
  let mut authorized: HashSet<&ReaderNumber> = HashSet::new();

  for edge in authorizations {
    let (Some(person), Some(reader)) = (
      people_by_number.get(&edge.person_number),
      readers_by_number.get(&edge.reader_number),
    ) else {
      tracing::debug!(
        person = %edge.person_number,
        reader = %edge.reader_number,
        "authorization refers to a missing record"
      );
      continue;
    };
    authorized.insert(&edge.reader_number);
    rows.push(person_cells(person).into_iter().chain(reader_cells(reader)).collect());
  }

  let edges = rows.len();
  let mut missing = 0;
  for reader in readers.iter().filter(|r| !authorized.contains(&r.reader_number)) {
    missing += 1;
    rows.push(
      std::iter::repeat_n(None, PERSON_HEADER.len())
        .chain(reader_cells(reader))
        .collect(),
    );
  }
  tracing::info!(
    edges,
    readers_without_authorization = missing,
    "built authorizations report"
  );

  Report {
    header: PERSON_HEADER.into_iter().chain(READER_HEADER).collect(),
    rows,
  }
}

/// Every reader, one row each.
pub fn readers_report(readers: &[Reader]) -> Report {
  Report {
    header: READER_HEADER.to_vec(),
    rows:   readers.iter().map(|r| reader_cells(r).to_vec()).collect(),
  }
}

/// Department key for a person: the ASCII-folded, lowercase last name
/// without spaces, followed by the person number.
pub fn department_key(person: &Person) -> String {
  let last = person.last_name.as_deref().unwrap_or_default();
  let folded: String = deunicode::deunicode(last)
    .chars()
    .filter(|c| !c.is_whitespace())
    .collect();
  format!("{}{}", folded.to_lowercase(), person.person_number)
}

/// One row per person with the reader numbers they may use.
pub fn departments_report(people: &[Person], authorizations: &[Authorization]) -> Report {
  let mut readers_by_person: HashMap<&PersonNumber, Vec<&str>> = HashMap::new();
  for edge in authorizations {
    readers_by_person
      .entry(&edge.person_number)
      .or_default()
      .push(edge.reader_number.as_str());
  }

  let rows = people
    .iter()
    .map(|person| {
      let readers = readers_by_person
        .get(&person.person_number)
        .map(|r| r.join(" "))
        .unwrap_or_default();
      vec![
        None,
        person.last_name.clone(),
        Some(department_key(person)),
        Some(readers),
      ]
    })
    .collect();

  Report {
    header: vec!["dept_id", "dept_name", "dept_authorized", "dept_readers"],
    rows,
  }
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// Write `report` to a new workbook at `path`, header row in bold.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  let bold = Format::new().set_bold();

  for (col, title) in report.header.iter().enumerate() {
    sheet.write_string_with_format(0, col as u16, *title, &bold)?;
  }

  for (i, row) in report.rows.iter().enumerate() {
    let r = i as u32 + 1;
    for (col, cell) in row.iter().enumerate() {
      if let Some(value) = cell {
        sheet.write_string(r, col as u16, value)?;
      }
    }
  }

  workbook.save(path)?;
  tracing::info!(path = %path.display(), rows = report.rows.len(), "wrote report");
  Ok(())
}

#[cfg(test)]
mod tests {
  use doorlist_core::{cell::CellValue, normalize::Blueprint};

  use super::*;
  use crate::ingest::{SheetLayout, read_sheet};

  fn pn(s: &str) -> PersonNumber { s.parse().unwrap() }

  fn rn(s: &str) -> ReaderNumber { s.parse().unwrap() }

  fn people() -> Vec<Person> {
    vec![
      Person::new(pn("1")).with_name("Jan", "Novák"),
      Person::new(pn("2")).with_name("Eva", "Van Dyke"),
    ]
  }

  fn readers() -> Vec<Reader> {
    let mut room = Reader::bare(rn("12"));
    room.location_blueprint = Blueprint::normalize("A-PR-500");
    room.location_hospital = Some("H1".into());
    room.location_name = Some("Room 5".into());
    vec![room, Reader::bare(rn("99"))]
  }

  fn edges() -> Vec<Authorization> {
    vec![Authorization { person_number: pn("1"), reader_number: rn("12") }]
  }

  #[test]
  fn authorizations_report_lists_unauthorized_readers_last() {
    let report = authorizations_report(&people(), &readers(), &edges());
    assert_eq!(report.header.len(), 10);
    assert_eq!(report.rows.len(), 2);

    let edge = &report.rows[0];
    assert_eq!(edge[0].as_deref(), Some("1"));
    assert_eq!(edge[1].as_deref(), Some("Jan"));
    assert_eq!(edge[5].as_deref(), Some("00012"));
    assert_eq!(edge[6].as_deref(), Some("A-PR.500"));
    assert_eq!(edge[7].as_deref(), Some("H1"));

    let bare = &report.rows[1];
    assert!(bare[..5].iter().all(Option::is_none));
    assert_eq!(bare[5].as_deref(), Some("00099"));
  }

  #[test]
  fn dangling_edges_are_skipped() {
    let dangling = vec![Authorization { person_number: pn("404"), reader_number: rn("12") }];
    let report = authorizations_report(&people(), &readers(), &dangling);
    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r[0].is_none()));
  }

  #[test]
  fn department_key_folds_diacritics_and_spaces() {
    let people = people();
    assert_eq!(department_key(&people[0]), "novak1");
    assert_eq!(department_key(&people[1]), "vandyke2");
  }

  #[test]
  fn departments_report_joins_reader_numbers() {
    let mut edges = edges();
    edges.push(Authorization { person_number: pn("1"), reader_number: rn("99") });
    let report = departments_report(&people(), &edges);

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0][1].as_deref(), Some("Novák"));
    assert_eq!(report.rows[0][3].as_deref(), Some("00012 00099"));
    assert_eq!(report.rows[1][3].as_deref(), Some(""));
  }

  #[test]
  fn written_reader_numbers_keep_padding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readers.xlsx");
    write_report(&readers_report(&readers()), &path).unwrap();

    let rows = read_sheet(&path, &SheetLayout::new([1, 2]).with_header_rows(1)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], CellValue::text("00012"));
    assert_eq!(rows[0][1], CellValue::text("A-PR.500"));
    assert_eq!(rows[1][0], CellValue::text("00099"));
    assert_eq!(rows[1][1], CellValue::Empty);
  }
}
