//! [`SqliteStore`] — the SQLite implementation of [`AccessStore`].

use std::{collections::HashMap, path::Path};

use doorlist_core::{
  person::{Person, PersonNumber},
  reader::{Reader, ReaderNumber},
  store::{AccessStore, Authorization, InsertOutcome},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{PERSON_COLUMNS, READER_COLUMNS, RawAuthorization, RawPerson, RawReader},
  schema::SCHEMA,
};

fn outcome(changed: usize) -> InsertOutcome {
  if changed == 0 { InsertOutcome::AlreadyPresent } else { InsertOutcome::Inserted }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Doorlist store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Authorized person numbers grouped by reader number, in insertion order.
  async fn authorized_by_reader(
    &self,
    reader_number: Option<String>,
  ) -> Result<HashMap<String, Vec<String>>> {
    let pairs: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT reader_number, person_number FROM authorizations
           WHERE ?1 IS NULL OR reader_number = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![reader_number], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (reader, person) in pairs {
      grouped.entry(reader).or_default().push(person);
    }
    Ok(grouped)
  }
}

// ─── AccessStore impl ────────────────────────────────────────────────────────

impl AccessStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_person(&self, person: &Person) -> Result<InsertOutcome> {
    let number      = person.person_number.to_string();
    let first_name  = person.first_name.clone();
    let last_name   = person.last_name.clone();
    let card_number = person.card_number.clone();
    let email       = person.email.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO people (person_number, first_name, last_name, card_number, email)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (person_number) DO NOTHING",
          rusqlite::params![number, first_name, last_name, card_number, email],
        )?)
      })
      .await?;

    if changed == 0 {
      tracing::debug!(person = %person.person_number, "person already stored");
    }
    Ok(outcome(changed))
  }

  async fn insert_reader(&self, reader: &Reader) -> Result<InsertOutcome> {
    let number    = reader.reader_number.to_string();
    let blueprint = reader.location_blueprint.as_ref().map(ToString::to_string);
    let hospital  = reader.location_hospital.clone();
    let name      = reader.location_name.clone();
    let abi       = reader.abi_location.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO readers (
             reader_number, location_blueprint, location_hospital,
             location_name, abi_location
           ) VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (reader_number) DO NOTHING",
          rusqlite::params![number, blueprint, hospital, name, abi],
        )?)
      })
      .await?;

    if changed == 0 {
      tracing::debug!(reader = %reader.reader_number, "reader already stored");
    }
    Ok(outcome(changed))
  }

  async fn insert_authorization(
    &self,
    person: &PersonNumber,
    reader: &ReaderNumber,
  ) -> Result<InsertOutcome> {
    let person_str = person.to_string();
    let reader_str = reader.to_string();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO authorizations (person_number, reader_number)
           VALUES (?1, ?2)
           ON CONFLICT (person_number, reader_number) DO NOTHING",
          rusqlite::params![person_str, reader_str],
        )?)
      })
      .await?;

    Ok(outcome(changed))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_person(&self, number: &PersonNumber) -> Result<Option<Person>> {
    let number = number.to_string();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_number = ?1"),
            rusqlite::params![number],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn get_reader(&self, number: &ReaderNumber) -> Result<Option<Reader>> {
    let number = number.to_string();
    let lookup = number.clone();

    let raw: Option<RawReader> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {READER_COLUMNS} FROM readers WHERE reader_number = ?1"),
            rusqlite::params![lookup],
            RawReader::from_row,
          )
          .optional()?)
      })
      .await?;

    let Some(raw) = raw else {
      return Ok(None);
    };
    let mut authorized = self.authorized_by_reader(Some(number.clone())).await?;
    let persons = authorized.remove(&number).unwrap_or_default();
    raw.into_reader(persons).map(Some)
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn list_readers(&self) -> Result<Vec<Reader>> {
    let raws: Vec<RawReader> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {READER_COLUMNS} FROM readers ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawReader::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut authorized = self.authorized_by_reader(None).await?;
    raws
      .into_iter()
      .map(|raw| {
        let persons = authorized.remove(&raw.reader_number).unwrap_or_default();
        raw.into_reader(persons)
      })
      .collect()
  }

  async fn list_authorizations(&self) -> Result<Vec<Authorization>> {
    let raws: Vec<RawAuthorization> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_number, reader_number FROM authorizations ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAuthorization {
              person_number: row.get(0)?,
              reader_number: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuthorization::into_authorization).collect()
  }
}
