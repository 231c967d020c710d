//! ReaderRegistry — the key-addressed reader collection threaded through the
//! enrichment stages.

use std::collections::HashMap;

use crate::{
  normalize::Blueprint,
  reader::{Reader, ReaderKey, ReaderNumber},
};

/// What [`ReaderRegistry::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
  Inserted,
  /// A reader with a numerically equal number was already present and has
  /// been replaced in place.
  Replaced,
}

/// Readers in discovery order, indexed by [`ReaderKey`].
///
/// Never holds two readers with numerically equal reader numbers.
#[derive(Debug, Clone, Default)]
pub struct ReaderRegistry {
  readers: Vec<Reader>,
  index:   HashMap<ReaderKey, usize>,
}

impl ReaderRegistry {
  pub fn new() -> Self { Self::default() }

  pub fn len(&self) -> usize { self.readers.len() }

  pub fn is_empty(&self) -> bool { self.readers.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Reader> { self.readers.iter() }

  pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Reader> { self.readers.iter_mut() }

  pub fn contains(&self, number: &ReaderNumber) -> bool {
    self.index.contains_key(&number.key())
  }

  pub fn get(&self, number: &ReaderNumber) -> Option<&Reader> {
    self.index.get(&number.key()).map(|&i| &self.readers[i])
  }

  pub fn get_mut(&mut self, number: &ReaderNumber) -> Option<&mut Reader> {
    self.index.get(&number.key()).map(|&i| &mut self.readers[i])
  }

  /// Insert `reader`, or replace the existing reader with the same key while
  /// keeping its position. The last write is authoritative.
  pub fn upsert(&mut self, reader: Reader) -> Upserted {
    match self.index.get(&reader.key()) {
      Some(&i) => {
        self.readers[i] = reader;
        Upserted::Replaced
      }
      None => {
        self.index.insert(reader.key(), self.readers.len());
        self.readers.push(reader);
        Upserted::Inserted
      }
    }
  }

  /// Append a bare reader unless one with the same key exists. Returns
  /// whether a reader was added.
  pub fn insert_bare(&mut self, number: ReaderNumber) -> bool {
    if self.contains(&number) {
      return false;
    }
    self.upsert(Reader::bare(number));
    true
  }

  /// Every reader whose blueprint equals `blueprint`. Readers without a
  /// blueprint never match.
  pub fn with_blueprint_mut<'a>(
    &'a mut self,
    blueprint: &'a Blueprint,
  ) -> impl Iterator<Item = &'a mut Reader> + 'a {
    self
      .readers
      .iter_mut()
      .filter(move |r| r.location_blueprint.as_ref() == Some(blueprint))
  }

  pub fn into_readers(self) -> Vec<Reader> { self.readers }
}

impl FromIterator<Reader> for ReaderRegistry {
  fn from_iter<T: IntoIterator<Item = Reader>>(iter: T) -> Self {
    let mut registry = Self::new();
    for reader in iter {
      registry.upsert(reader);
    }
    registry
  }
}

impl<'a> IntoIterator for &'a ReaderRegistry {
  type IntoIter = std::slice::Iter<'a, Reader>;
  type Item = &'a Reader;

  fn into_iter(self) -> Self::IntoIter { self.readers.iter() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rn(s: &str) -> ReaderNumber { s.parse().unwrap() }

  #[test]
  fn lookup_is_numeric() {
    let registry: ReaderRegistry = [Reader::bare(rn("12"))].into_iter().collect();
    assert!(registry.contains(&rn("00012")));
    assert!(registry.get(&rn("012")).is_some());
    assert!(registry.get(&rn("13")).is_none());
  }

  #[test]
  fn upsert_replaces_in_place() {
    let mut registry = ReaderRegistry::new();
    registry.upsert(Reader::bare(rn("1")));
    registry.upsert(Reader::bare(rn("2")));

    let mut again = Reader::bare(rn("00001"));
    again.location_name = Some("second".into());
    assert_eq!(registry.upsert(again), Upserted::Replaced);

    assert_eq!(registry.len(), 2);
    let first = registry.iter().next().unwrap();
    assert_eq!(first.location_name.as_deref(), Some("second"));
  }

  #[test]
  fn insert_bare_skips_existing() {
    let mut registry = ReaderRegistry::new();
    assert!(registry.insert_bare(rn("5")));
    assert!(!registry.insert_bare(rn("00005")));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn blueprint_match_ignores_unset_blueprints() {
    let mut with = Reader::bare(rn("1"));
    with.location_blueprint = Blueprint::normalize("A-PR-500");
    let mut registry: ReaderRegistry =
      [with, Reader::bare(rn("2"))].into_iter().collect();

    let bp = Blueprint::normalize("a-pr.500").unwrap();
    let hits: Vec<_> = registry
      .with_blueprint_mut(&bp)
      .map(|r| r.reader_number.clone())
      .collect();
    assert_eq!(hits, vec![rn("1")]);
  }
}
