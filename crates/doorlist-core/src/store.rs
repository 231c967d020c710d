//! The `AccessStore` trait and the generic persistence driver.
//!
//! Implemented by storage backends (e.g. `doorlist-store-sqlite`). Inserting
//! a record whose key already exists is a no-op reported as
//! [`InsertOutcome::AlreadyPresent`], never an error, so a build can be
//! replayed against a populated store.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  person::{Person, PersonNumber},
  pipeline::Reconciliation,
  reader::{Reader, ReaderNumber},
};

// ─── Record types ────────────────────────────────────────────────────────────

/// A persisted authorization edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authorization {
  pub person_number: PersonNumber,
  pub reader_number: ReaderNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  /// The key was already taken; the stored record is unchanged.
  AlreadyPresent,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Doorlist storage backend.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime.
pub trait AccessStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  fn insert_person<'a>(
    &'a self,
    person: &'a Person,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + 'a;

  /// Insert the reader's own fields. Authorization edges are written
  /// separately with [`AccessStore::insert_authorization`].
  fn insert_reader<'a>(
    &'a self,
    reader: &'a Reader,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + 'a;

  /// Both endpoints must already be stored.
  fn insert_authorization<'a>(
    &'a self,
    person: &'a PersonNumber,
    reader: &'a ReaderNumber,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Look up a person by primary key. Returns `None` if not found.
  fn get_person<'a>(
    &'a self,
    number: &'a PersonNumber,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Look up a reader by primary key, with its authorized persons loaded.
  fn get_reader<'a>(
    &'a self,
    number: &'a ReaderNumber,
  ) -> impl Future<Output = Result<Option<Reader>, Self::Error>> + Send + 'a;

  fn list_people(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// All readers, each with its authorized persons loaded.
  fn list_readers(&self) -> impl Future<Output = Result<Vec<Reader>, Self::Error>> + Send + '_;

  fn list_authorizations(
    &self,
  ) -> impl Future<Output = Result<Vec<Authorization>, Self::Error>> + Send + '_;
}

// ─── Persistence driver ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
  pub inserted:        usize,
  pub already_present: usize,
}

impl Tally {
  fn record(&mut self, outcome: InsertOutcome) {
    match outcome {
      InsertOutcome::Inserted => self.inserted += 1,
      InsertOutcome::AlreadyPresent => self.already_present += 1,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistReport {
  pub people:         Tally,
  pub readers:        Tally,
  pub authorizations: Tally,
}

/// Write people, then readers, then every authorization edge.
pub async fn persist<S: AccessStore>(
  store: &S,
  reconciliation: &Reconciliation,
) -> Result<PersistReport, S::Error> {
  let mut report = PersistReport::default();

  for person in &reconciliation.roster {
    report.people.record(store.insert_person(person).await?);
  }

  for reader in &reconciliation.readers {
    report.readers.record(store.insert_reader(reader).await?);
  }

  for reader in &reconciliation.readers {
    for person in reader.authorized_persons() {
      let outcome = store.insert_authorization(person, &reader.reader_number).await?;
      report.authorizations.record(outcome);
    }
  }

  tracing::info!(
    people = report.people.inserted,
    readers = report.readers.inserted,
    authorizations = report.authorizations.inserted,
    "persisted reconciliation"
  );
  Ok(report)
}
