//! Name matching by token-set equality.
//!
//! A candidate such as `"novak jan"` matches a person whose case-folded
//! `{first_name, last_name}` set equals the candidate's token set. Order does
//! not matter; nothing partial or fuzzy is attempted.

use std::collections::HashMap;

use crate::{person::Person, roster::PersonRoster};

/// Case-fold a name fragment for comparison.
///
/// Full Unicode default case folding, so `ß` and `SS` compare equal.
pub fn casefold(s: &str) -> String { caseless::default_case_fold_str(s.trim()) }

/// Split a personnel-name field into a candidate token list.
///
/// Returns `None` for blank fields and for the literal placeholder `none`.
/// The whole field is one candidate: a field naming two people yields four
/// tokens and will not match anyone.
pub fn candidate_tokens(field: &str) -> Option<Vec<String>> {
  let folded = casefold(field);
  if folded.is_empty() || folded == "none" {
    return None;
  }
  Some(folded.split_whitespace().map(str::to_owned).collect())
}

/// An unordered pair of distinct case-folded name tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameKey(String, String);

impl NameKey {
  fn new(a: String, b: String) -> Option<Self> {
    match a.cmp(&b) {
      std::cmp::Ordering::Less => Some(Self(a, b)),
      std::cmp::Ordering::Greater => Some(Self(b, a)),
      std::cmp::Ordering::Equal => None,
    }
  }

  fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Option<Self> {
    let mut folded: Vec<String> = tokens.iter().map(|t| casefold(t.as_ref())).collect();
    folded.sort();
    folded.dedup();
    match <[String; 2]>::try_from(folded) {
      Ok([a, b]) => Self::new(a, b),
      Err(_) => None,
    }
  }

  fn from_person(person: &Person) -> Option<Self> {
    let first = casefold(person.first_name.as_deref()?);
    let last = casefold(person.last_name.as_deref()?);
    Self::new(first, last)
  }
}

/// Outcome of a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch<'r> {
  Found(&'r Person),
  /// More than one person shares the token set; the first in roster order
  /// is chosen.
  Ambiguous { chosen: &'r Person, candidates: usize },
  NotFound,
}

impl<'r> NameMatch<'r> {
  pub fn person(self) -> Option<&'r Person> {
    match self {
      Self::Found(p) | Self::Ambiguous { chosen: p, .. } => Some(p),
      Self::NotFound => None,
    }
  }
}

/// Token-set index over a [`PersonRoster`].
///
/// People without both names, or whose first and last names fold to the
/// same token, are never indexed.
pub struct NameMatcher<'r> {
  roster: &'r PersonRoster,
  index:  HashMap<NameKey, Vec<usize>>,
}

impl<'r> NameMatcher<'r> {
  pub fn new(roster: &'r PersonRoster) -> Self {
    let mut index: HashMap<NameKey, Vec<usize>> = HashMap::new();
    for (i, person) in roster.iter().enumerate() {
      if let Some(key) = NameKey::from_person(person) {
        index.entry(key).or_default().push(i);
      }
    }
    Self { roster, index }
  }

  /// Match an already tokenized candidate. Anything other than exactly two
  /// distinct tokens is `NotFound`.
  pub fn match_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> NameMatch<'r> {
    let Some(hits) = NameKey::from_tokens(tokens).and_then(|k| self.index.get(&k)) else {
      return NameMatch::NotFound;
    };
    let people = self.roster.as_slice();
    match hits.as_slice() {
      [] => NameMatch::NotFound,
      [only] => NameMatch::Found(&people[*only]),
      [first, ..] => NameMatch::Ambiguous {
        chosen:     &people[*first],
        candidates: hits.len(),
      },
    }
  }

  /// Tokenize a raw personnel-name field and match it.
  pub fn match_field(&self, field: &str) -> NameMatch<'r> {
    candidate_tokens(field).map_or(NameMatch::NotFound, |t| self.match_tokens(&t))
  }
}
