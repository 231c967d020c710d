//! Reader enrichment stages.
//!
//! Each stage consumes one source and advances the [`ReaderRegistry`]. No
//! stage fails: rows that find nothing to act on are counted and skipped.

use serde::Serialize;

use crate::{
  normalize::Blueprint,
  reader::Reader,
  registry::{ReaderRegistry, Upserted},
  source::{AbiLocationRow, ReaderListRow, ReaderRow},
};

/// Row accounting for a single stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
  pub rows:    usize,
  pub created: usize,
  pub updated: usize,
  pub skipped: usize,
}

/// Stage A: build the registry from the base reader export.
///
/// Every row becomes a reader with a normalized blueprint. A repeated reader
/// number replaces the earlier reader.
pub fn seed(rows: impl IntoIterator<Item = ReaderRow>) -> (ReaderRegistry, StageReport) {
  let mut registry = ReaderRegistry::new();
  let mut report = StageReport::default();

  for row in rows {
    report.rows += 1;
    let mut reader = Reader::bare(row.reader_number);
    reader.location_blueprint = Blueprint::from_cell(&row.raw_location);
    reader.location_name = row.location_name;

    match registry.upsert(reader) {
      Upserted::Inserted => report.created += 1,
      Upserted::Replaced => {
        tracing::debug!("duplicate reader number in seed source, keeping last row");
        report.updated += 1;
      }
    }
  }

  tracing::info!(readers = registry.len(), rows = report.rows, "seeded readers");
  (registry, report)
}

/// Stage B: copy the secondary location onto readers already in the
/// registry. Rows for unknown readers are dropped.
pub fn attach_abi_locations(
  registry: &mut ReaderRegistry,
  rows: impl IntoIterator<Item = AbiLocationRow>,
) -> StageReport {
  let mut report = StageReport::default();

  for row in rows {
    report.rows += 1;
    match registry.get_mut(&row.reader_number) {
      Some(reader) => {
        reader.abi_location = row.abi_location;
        report.updated += 1;
      }
      None => {
        tracing::debug!(reader = %row.reader_number, "no reader for secondary location");
        report.skipped += 1;
      }
    }
  }

  tracing::info!(
    updated = report.updated,
    skipped = report.skipped,
    "attached secondary locations"
  );
  report
}

/// Stage C: add a bare reader for every number missing from the registry.
pub fn discover_orphans(
  registry: &mut ReaderRegistry,
  rows: impl IntoIterator<Item = ReaderListRow>,
) -> StageReport {
  let mut report = StageReport::default();

  for row in rows {
    report.rows += 1;
    if registry.insert_bare(row.reader_number) {
      report.created += 1;
    } else {
      report.skipped += 1;
    }
  }

  tracing::info!(created = report.created, "discovered orphan readers");
  report
}
