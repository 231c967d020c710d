//! The reconciliation pipeline: seed → secondary-attach → orphan discovery →
//! name resolution, always in that order.

use serde::Serialize;

use crate::{
  enrich::{self, StageReport},
  registry::ReaderRegistry,
  resolve::{AuthorizationResolver, ResolveReport},
  roster::PersonRoster,
  source::{AbiLocationRow, AuthorizationRow, PersonRow, ReaderListRow, ReaderRow},
};

/// Every input the pipeline consumes. The secondary-location and reader-list
/// sources are optional; a missing one skips its stage.
#[derive(Debug, Clone, Default)]
pub struct Sources {
  pub readers:        Vec<ReaderRow>,
  pub abi_locations:  Option<Vec<AbiLocationRow>>,
  pub reader_list:    Option<Vec<ReaderListRow>>,
  pub people:         Vec<PersonRow>,
  pub authorizations: Vec<AuthorizationRow>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
  pub seed:           StageReport,
  pub abi_locations:  Option<StageReport>,
  pub orphans:        Option<StageReport>,
  pub people:         usize,
  pub authorizations: ResolveReport,
}

/// The terminal artifact handed to persistence.
#[derive(Debug, Clone)]
pub struct Reconciliation {
  pub readers: ReaderRegistry,
  pub roster:  PersonRoster,
  pub report:  ReconcileReport,
}

/// Run every stage over `sources`.
pub fn reconcile(sources: Sources) -> Reconciliation {
  let Sources { readers, abi_locations, reader_list, people, authorizations } = sources;

  let (mut registry, seed) = enrich::seed(readers);
  let abi_locations = abi_locations.map(|rows| enrich::attach_abi_locations(&mut registry, rows));
  let orphans = reader_list.map(|rows| enrich::discover_orphans(&mut registry, rows));

  let roster = PersonRoster::from_rows(people);
  let authorizations = AuthorizationResolver::new(&roster).resolve(&mut registry, authorizations);

  let report = ReconcileReport {
    seed,
    abi_locations,
    orphans,
    people: roster.len(),
    authorizations,
  };

  Reconciliation { readers: registry, roster, report }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{cell::CellValue, reader::ReaderNumber};

  fn rn(s: &str) -> ReaderNumber { s.parse().unwrap() }

  fn base_sources() -> Sources {
    Sources {
      readers: vec![ReaderRow {
        reader_number: rn("12"),
        raw_location:  "A-PR-500".into(),
        location_name: Some("Room 5".into()),
      }],
      people: vec![PersonRow {
        person_number: "1".parse().unwrap(),
        email:         Some("x@y.com".into()),
        last_name:     Some("Novak".into()),
        first_name:    Some("Jan".into()),
        card_number:   Some("C1".into()),
      }],
      authorizations: vec![AuthorizationRow {
        hospital:      Some("H1".into()),
        name:          Some("Room 5".into()),
        detail:        None,
        raw_blueprint: "A-PR.500".into(),
        names_1:       Some("jan novak".into()),
        names_2:       Some("none".into()),
      }],
      ..Sources::default()
    }
  }

  #[test]
  fn end_to_end_single_authorization() {
    let rec = reconcile(base_sources());

    let reader = rec.readers.get(&rn("12")).unwrap();
    assert_eq!(reader.location_hospital.as_deref(), Some("H1"));
    assert_eq!(reader.location_name.as_deref(), Some("Room 5"));
    assert_eq!(reader.authorized_persons().len(), 1);
    assert_eq!(reader.authorized_persons()[0].as_str(), "1");

    assert_eq!(rec.report.people, 1);
    assert_eq!(rec.report.authorizations.edges_added, 1);
    assert!(rec.report.abi_locations.is_none());
    assert!(rec.report.orphans.is_none());
  }

  #[test]
  fn orphan_from_reader_list_is_bare() {
    let mut sources = base_sources();
    sources.reader_list = Some(vec![
      ReaderListRow { reader_number: rn("12") },
      ReaderListRow { reader_number: rn("777") },
    ]);
    let rec = reconcile(sources);

    assert_eq!(rec.readers.len(), 2);
    let orphan = rec.readers.get(&rn("777")).unwrap();
    assert!(orphan.location_blueprint.is_none());
    assert!(orphan.location_hospital.is_none());
    assert!(orphan.location_name.is_none());
    assert!(orphan.abi_location.is_none());
    assert!(orphan.authorized_persons().is_empty());
  }

  #[test]
  fn secondary_locations_survive_resolution() {
    let mut sources = base_sources();
    sources.abi_locations = Some(vec![AbiLocationRow {
      reader_number: rn("00012"),
      abi_location:  Some("ABI-7".into()),
    }]);
    let rec = reconcile(sources);
    let reader = rec.readers.get(&rn("12")).unwrap();
    assert_eq!(reader.abi_location.as_deref(), Some("ABI-7"));
    assert_eq!(reader.location_hospital.as_deref(), Some("H1"));
  }

  #[test]
  fn missing_match_leaves_edges_untouched() {
    let mut sources = base_sources();
    sources.authorizations[0].raw_blueprint = CellValue::text("B-XX.1");
    let rec = reconcile(sources);
    assert!(rec.readers.iter().all(|r| r.authorized_persons().is_empty()));
    assert_eq!(rec.report.authorizations.unmatched_rows, 1);
  }

  #[test]
  fn report_serializes() {
    let rec = reconcile(base_sources());
    let json = serde_json::to_value(&rec.report).unwrap();
    assert_eq!(json["authorizations"]["edges_added"], 1);
    assert_eq!(json["seed"]["created"], 1);
  }
}
