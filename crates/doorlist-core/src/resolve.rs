//! AuthorizationResolver — turns free-text authorization rows into
//! reader ↔ person edges.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
  matcher::{NameMatch, NameMatcher},
  normalize::Blueprint,
  person::Person,
  registry::ReaderRegistry,
  roster::PersonRoster,
  source::AuthorizationRow,
};

/// Row and edge accounting for one resolver run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
  pub rows:             usize,
  pub matched_rows:     usize,
  pub unmatched_rows:   usize,
  pub readers_updated:  usize,
  pub edges_added:      usize,
  /// Name fields that matched nobody, as written in the source.
  pub unresolved_names: BTreeSet<String>,
  /// Name fields that matched several people; the first was used.
  pub ambiguous_names:  BTreeSet<String>,
}

/// Resolves authorization rows against a registry and a roster.
pub struct AuthorizationResolver<'r> {
  matcher: NameMatcher<'r>,
}

/// `"{name} ({detail})"` when a detail is present, otherwise the name alone.
pub fn compose_location_name(name: Option<&str>, detail: Option<&str>) -> Option<String> {
  match (name, detail) {
    (Some(name), Some(detail)) => Some(format!("{name} ({detail})")),
    (Some(name), None) => Some(name.to_owned()),
    (None, Some(detail)) => Some(detail.to_owned()),
    (None, None) => None,
  }
}

impl<'r> AuthorizationResolver<'r> {
  pub fn new(roster: &'r PersonRoster) -> Self { Self { matcher: NameMatcher::new(roster) } }

  /// Fold every row into `registry`. Rows whose blueprint matches no reader
  /// leave the registry untouched. Running twice is a no-op the second time
  /// as far as edges go.
  pub fn resolve(
    &self,
    registry: &mut ReaderRegistry,
    rows: impl IntoIterator<Item = AuthorizationRow>,
  ) -> ResolveReport {
    let mut report = ResolveReport::default();
    for row in rows {
      self.apply_row(registry, &row, &mut report);
    }

    tracing::info!(
      rows = report.rows,
      matched = report.matched_rows,
      edges = report.edges_added,
      unresolved = report.unresolved_names.len(),
      "resolved authorizations"
    );
    report
  }

  fn apply_row(
    &self,
    registry: &mut ReaderRegistry,
    row: &AuthorizationRow,
    report: &mut ResolveReport,
  ) {
    report.rows += 1;

    let Some(blueprint) = Blueprint::from_cell(&row.raw_blueprint) else {
      report.unmatched_rows += 1;
      return;
    };

    let mut readers = registry.with_blueprint_mut(&blueprint).peekable();
    if readers.peek().is_none() {
      tracing::debug!(%blueprint, "no reader for authorization row");
      report.unmatched_rows += 1;
      return;
    }
    report.matched_rows += 1;

    let people = self.people_for(row, report);
    let location_name = compose_location_name(row.name.as_deref(), row.detail.as_deref());

    for reader in readers {
      reader.location_hospital = row.hospital.clone();
      reader.location_name = location_name.clone();
      report.readers_updated += 1;

      for person in &people {
        if reader.authorize(person) {
          report.edges_added += 1;
        }
      }
    }
  }

  fn people_for(&self, row: &AuthorizationRow, report: &mut ResolveReport) -> Vec<&'r Person> {
    row
      .name_fields()
      .into_iter()
      .flatten()
      .filter_map(|field| match self.matcher.match_field(field) {
        NameMatch::Found(person) => Some(person),
        NameMatch::Ambiguous { chosen, candidates } => {
          tracing::warn!(
            name = field,
            candidates,
            chosen = %chosen.person_number,
            "ambiguous name, using first roster entry"
          );
          report.ambiguous_names.insert(field.to_owned());
          Some(chosen)
        }
        NameMatch::NotFound => {
          if crate::matcher::candidate_tokens(field).is_some() {
            tracing::debug!(name = field, "name matched nobody");
            report.unresolved_names.insert(field.to_owned());
          }
          None
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    cell::CellValue,
    enrich::seed,
    reader::ReaderNumber,
    source::ReaderRow,
  };

  fn rn(s: &str) -> ReaderNumber { s.parse().unwrap() }

  fn registry() -> ReaderRegistry {
    seed([
      ReaderRow {
        reader_number: rn("12"),
        raw_location:  "A-PR-500".into(),
        location_name: Some("Room 5".into()),
      },
      ReaderRow {
        reader_number: rn("13"),
        raw_location:  "a-pr-500".into(),
        location_name: None,
      },
      ReaderRow {
        reader_number: rn("14"),
        raw_location:  CellValue::Empty,
        location_name: None,
      },
    ])
    .0
  }

  fn roster() -> PersonRoster {
    PersonRoster::new(vec![
      Person::new("1".parse().unwrap()).with_name("Jan", "Novak"),
      Person::new("2".parse().unwrap()).with_name("Eva", "Dvorak"),
    ])
  }

  fn row(blueprint: &str, names_1: Option<&str>, names_2: Option<&str>) -> AuthorizationRow {
    AuthorizationRow {
      hospital:      Some("H1".into()),
      name:          Some("Room 5".into()),
      detail:        None,
      raw_blueprint: blueprint.into(),
      names_1:       names_1.map(Into::into),
      names_2:       names_2.map(Into::into),
    }
  }

  fn edges(registry: &ReaderRegistry, number: &str) -> Vec<String> {
    registry
      .get(&rn(number))
      .unwrap()
      .authorized_persons()
      .iter()
      .map(ToString::to_string)
      .collect()
  }

  #[test]
  fn matches_every_reader_with_the_blueprint() {
    let roster = roster();
    let mut registry = registry();
    let report = AuthorizationResolver::new(&roster)
      .resolve(&mut registry, [row("A-PR.500", Some("jan novak"), Some("dvorak eva"))]);

    assert_eq!(report.matched_rows, 1);
    assert_eq!(report.readers_updated, 2);
    assert_eq!(report.edges_added, 4);
    assert_eq!(edges(&registry, "12"), vec!["1", "2"]);
    assert_eq!(edges(&registry, "13"), vec!["1", "2"]);
    assert!(edges(&registry, "14").is_empty());

    let reader = registry.get(&rn("13")).unwrap();
    assert_eq!(reader.location_hospital.as_deref(), Some("H1"));
    assert_eq!(reader.location_name.as_deref(), Some("Room 5"));
  }

  #[test]
  fn raw_row_blueprint_is_normalized_before_comparing() {
    let roster = roster();
    let mut registry = registry();
    AuthorizationResolver::new(&roster)
      .resolve(&mut registry, [row(" a-pr-500", Some("jan novak"), None)]);
    assert_eq!(edges(&registry, "12"), vec!["1"]);
  }

  #[test]
  fn detail_is_appended_to_location_name() {
    let roster = roster();
    let mut registry = registry();
    let mut r = row("A-PR.500", None, None);
    r.detail = Some("east wing".into());
    AuthorizationResolver::new(&roster).resolve(&mut registry, [r]);
    assert_eq!(
      registry.get(&rn("12")).unwrap().location_name.as_deref(),
      Some("Room 5 (east wing)")
    );
  }

  #[test]
  fn unmatched_blueprint_changes_nothing() {
    let roster = roster();
    let mut registry = registry();
    let report = AuthorizationResolver::new(&roster)
      .resolve(&mut registry, [row("Z-ZZ.1", Some("jan novak"), None)]);

    assert_eq!(report.unmatched_rows, 1);
    assert!(registry.iter().all(|r| r.authorized_persons().is_empty()));
    assert!(registry.iter().all(|r| r.location_hospital.is_none()));
  }

  #[test]
  fn blank_blueprint_never_matches_unset_readers() {
    let roster = roster();
    let mut registry = registry();
    let mut r = row("", Some("jan novak"), None);
    r.raw_blueprint = CellValue::Empty;
    let report = AuthorizationResolver::new(&roster).resolve(&mut registry, [r]);
    assert_eq!(report.unmatched_rows, 1);
    assert!(edges(&registry, "14").is_empty());
  }

  #[test]
  fn resolving_twice_adds_no_edges() {
    let roster = roster();
    let mut registry = registry();
    let resolver = AuthorizationResolver::new(&roster);
    let rows = vec![
      row("A-PR.500", Some("jan novak"), None),
      row("A-PR-500", Some("novak jan"), Some("none")),
    ];

    let first = resolver.resolve(&mut registry, rows.clone());
    assert_eq!(first.edges_added, 2);
    let before = edges(&registry, "12");

    let second = resolver.resolve(&mut registry, rows);
    assert_eq!(second.edges_added, 0);
    assert_eq!(edges(&registry, "12"), before);
  }

  #[test]
  fn unresolved_names_are_reported_but_placeholders_are_not() {
    let roster = roster();
    let mut registry = registry();
    let report = AuthorizationResolver::new(&roster)
      .resolve(&mut registry, [row("A-PR.500", Some("Karel Novy"), Some("None"))]);
    assert_eq!(report.edges_added, 0);
    assert_eq!(
      report.unresolved_names.into_iter().collect::<Vec<_>>(),
      vec!["Karel Novy".to_string()]
    );
  }

  #[test]
  fn location_name_composition() {
    assert_eq!(compose_location_name(Some("R"), Some("d")).as_deref(), Some("R (d)"));
    assert_eq!(compose_location_name(Some("R"), None).as_deref(), Some("R"));
    assert_eq!(compose_location_name(None, None), None);
  }
}
