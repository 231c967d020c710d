//! PersonRoster — the flat, read-only list of people built from one source.

use crate::{
  person::{Person, PersonNumber},
  source::PersonRow,
};

/// People in source order. No de-duplication and no validation; a person
/// without both names can never be matched by name.
#[derive(Debug, Clone, Default)]
pub struct PersonRoster {
  people: Vec<Person>,
}

impl PersonRoster {
  pub fn new(people: Vec<Person>) -> Self { Self { people } }

  pub fn from_rows(rows: impl IntoIterator<Item = PersonRow>) -> Self {
    let roster: Self = rows.into_iter().map(Person::from).collect();
    tracing::info!(people = roster.len(), "built person roster");
    roster
  }

  pub fn len(&self) -> usize { self.people.len() }

  pub fn is_empty(&self) -> bool { self.people.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Person> { self.people.iter() }

  pub fn as_slice(&self) -> &[Person] { &self.people }

  /// First person with the given number.
  pub fn get(&self, number: &PersonNumber) -> Option<&Person> {
    self.people.iter().find(|p| &p.person_number == number)
  }
}

impl FromIterator<Person> for PersonRoster {
  fn from_iter<T: IntoIterator<Item = Person>>(iter: T) -> Self {
    Self { people: iter.into_iter().collect() }
  }
}

impl<'a> IntoIterator for &'a PersonRoster {
  type IntoIter = std::slice::Iter<'a, Person>;
  type Item = &'a Person;

  fn into_iter(self) -> Self::IntoIter { self.people.iter() }
}
