//! Person — an employee who may be granted access to readers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, cell::CellValue};

/// Roster identity of a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonNumber(String);

impl PersonNumber {
  /// Build from a cell. Numeric cells render without a fractional part, so
  /// `42.0` and `"42"` produce the same number. Blank cells yield `None`.
  pub fn from_cell(value: &CellValue) -> Option<Self> { value.as_text().map(Self) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl FromStr for PersonNumber {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.is_empty() {
      return Err(Error::EmptyPersonNumber);
    }
    Ok(Self(s.to_owned()))
  }
}

impl fmt::Display for PersonNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A roster entry. Immutable once built; equality is by person number only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_number: PersonNumber,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub card_number:   Option<String>,
  pub email:         Option<String>,
}

impl Person {
  pub fn new(person_number: PersonNumber) -> Self {
    Self {
      person_number,
      first_name: None,
      last_name: None,
      card_number: None,
      email: None,
    }
  }

  pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
    self.first_name = Some(first.into());
    self.last_name = Some(last.into());
    self
  }
}

impl PartialEq for Person {
  fn eq(&self, other: &Self) -> bool { self.person_number == other.person_number }
}

impl Eq for Person {}

impl fmt::Display for Person {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} - {} {}",
      self.person_number,
      self.first_name.as_deref().unwrap_or_default(),
      self.last_name.as_deref().unwrap_or_default(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn number_from_numeric_cell_has_no_fraction() {
    let a = PersonNumber::from_cell(&CellValue::Float(42.0)).unwrap();
    let b = PersonNumber::from_cell(&CellValue::text(" 42 ")).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "42");
  }

  #[test]
  fn empty_number_is_rejected() {
    assert!(PersonNumber::from_cell(&CellValue::Empty).is_none());
    assert!(matches!("  ".parse::<PersonNumber>(), Err(Error::EmptyPersonNumber)));
  }

  #[test]
  fn equality_ignores_attributes() {
    let n: PersonNumber = "7".parse().unwrap();
    let a = Person::new(n.clone()).with_name("Jan", "Novak");
    let b = Person::new(n);
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "7 - Jan Novak");
  }
}
