//! Reader — an access-controlled door, keyed by its reader number.

use std::{
  cmp::Ordering,
  fmt,
  hash::{Hash, Hasher},
  str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  cell::CellValue,
  normalize::Blueprint,
  person::{Person, PersonNumber},
};

/// Display width of a reader number. Shorter numbers are zero-padded.
pub const READER_NUMBER_WIDTH: usize = 5;

// ─── ReaderNumber ────────────────────────────────────────────────────────────

/// The logical identity of a reader number: its numeric value when it is all
/// digits, otherwise the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReaderKey {
  Numeric(u64),
  Text(String),
}

/// A reader number in its zero-padded display form.
///
/// Equality, hashing and ordering go through [`ReaderNumber::key`], so
/// `"00012"` and `"12"` are the same reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReaderNumber(String);

impl ReaderNumber {
  /// Build from raw text, padding to [`READER_NUMBER_WIDTH`]. Padding an
  /// already padded number is a no-op. Returns `None` for blank input.
  pub fn new(raw: &str) -> Option<Self> {
    let raw = raw.trim();
    if raw.is_empty() {
      return None;
    }
    let padded = match raw.parse::<u64>() {
      Ok(n) if raw.bytes().all(|b| b.is_ascii_digit()) => {
        format!("{n:0>width$}", width = READER_NUMBER_WIDTH)
      }
      _ => format!("{raw:0>width$}", width = READER_NUMBER_WIDTH),
    };
    Some(Self(padded))
  }

  pub fn from_cell(value: &CellValue) -> Option<Self> {
    value.as_text().and_then(|s| Self::new(&s))
  }

  pub fn key(&self) -> ReaderKey {
    match self.0.parse::<u64>() {
      Ok(n) if self.0.bytes().all(|b| b.is_ascii_digit()) => ReaderKey::Numeric(n),
      _ => ReaderKey::Text(self.0.trim_start_matches('0').to_owned()),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl PartialEq for ReaderNumber {
  fn eq(&self, other: &Self) -> bool { self.key() == other.key() }
}

impl Eq for ReaderNumber {}

impl Hash for ReaderNumber {
  fn hash<H: Hasher>(&self, state: &mut H) { self.key().hash(state) }
}

impl PartialOrd for ReaderNumber {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ReaderNumber {
  fn cmp(&self, other: &Self) -> Ordering { self.key().cmp(&other.key()) }
}

impl FromStr for ReaderNumber {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s).ok_or(Error::EmptyReaderNumber) }
}

impl TryFrom<String> for ReaderNumber {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<ReaderNumber> for String {
  fn from(value: ReaderNumber) -> Self { value.0 }
}

impl fmt::Display for ReaderNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Reader ──────────────────────────────────────────────────────────────────

/// An access-controlled door and the people authorized to use it.
///
/// Two readers are equal iff their reader numbers are; location fields and
/// authorizations do not take part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reader {
  pub reader_number:      ReaderNumber,
  pub location_blueprint: Option<Blueprint>,
  pub location_hospital:  Option<String>,
  pub location_name:      Option<String>,
  pub abi_location:       Option<String>,
  #[serde(default)]
  authorized_persons:     Vec<PersonNumber>,
}

impl Reader {
  /// A reader with every field but the number unset.
  pub fn bare(reader_number: ReaderNumber) -> Self {
    Self {
      reader_number,
      location_blueprint: None,
      location_hospital: None,
      location_name: None,
      abi_location: None,
      authorized_persons: Vec::new(),
    }
  }

  pub fn key(&self) -> ReaderKey { self.reader_number.key() }

  /// People authorized for this reader, in the order they were granted.
  pub fn authorized_persons(&self) -> &[PersonNumber] { &self.authorized_persons }

  pub fn is_authorized(&self, person: &PersonNumber) -> bool {
    self.authorized_persons.contains(person)
  }

  /// Add an authorization edge. Returns `false` if it was already present.
  pub fn authorize(&mut self, person: &Person) -> bool {
    self.grant(person.person_number.clone())
  }

  /// Add an authorization edge by person number.
  pub fn grant(&mut self, person: PersonNumber) -> bool {
    if self.is_authorized(&person) {
      return false;
    }
    self.authorized_persons.push(person);
    true
  }

  /// Remove an authorization edge. Returns `false` if it was not present.
  pub fn revoke(&mut self, person: &PersonNumber) -> bool {
    let before = self.authorized_persons.len();
    self.authorized_persons.retain(|p| p != person);
    self.authorized_persons.len() != before
  }
}

impl PartialEq for Reader {
  fn eq(&self, other: &Self) -> bool { self.key() == other.key() }
}

impl Eq for Reader {}

impl fmt::Display for Reader {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} - {}",
      self.reader_number,
      self.location_name.as_deref().unwrap_or_default()
    )
  }
}
