//! Raw row types and their conversion into domain types.
//!
//! Every column is stored as plain text. Keys are parsed back through the
//! core constructors so padding and normalization rules hold on the way out.

use doorlist_core::{
  normalize::Blueprint,
  person::Person,
  reader::Reader,
  store::Authorization,
};

use crate::{Error, Result};

pub const PERSON_COLUMNS: &str = "person_number, first_name, last_name, card_number, email";

pub const READER_COLUMNS: &str =
  "reader_number, location_blueprint, location_hospital, location_name, abi_location";

pub struct RawPerson {
  pub person_number: String,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub card_number:   Option<String>,
  pub email:         Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_number: row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      card_number:   row.get(3)?,
      email:         row.get(4)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_number: self.person_number.parse()?,
      first_name:    self.first_name,
      last_name:     self.last_name,
      card_number:   self.card_number,
      email:         self.email,
    })
  }
}

pub struct RawReader {
  pub reader_number:      String,
  pub location_blueprint: Option<String>,
  pub location_hospital:  Option<String>,
  pub location_name:      Option<String>,
  pub abi_location:       Option<String>,
}

impl RawReader {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      reader_number:      row.get(0)?,
      location_blueprint: row.get(1)?,
      location_hospital:  row.get(2)?,
      location_name:      row.get(3)?,
      abi_location:       row.get(4)?,
    })
  }

  /// Build a reader and attach the given authorized person numbers.
  pub fn into_reader(self, authorized: Vec<String>) -> Result<Reader> {
    let location_blueprint = self
      .location_blueprint
      .map(|bp| {
        Blueprint::normalize(&bp).ok_or_else(|| Error::InvalidBlueprint(self.reader_number.clone()))
      })
      .transpose()?;

    let mut reader = Reader::bare(self.reader_number.parse()?);
    reader.location_blueprint = location_blueprint;
    reader.location_hospital = self.location_hospital;
    reader.location_name = self.location_name;
    reader.abi_location = self.abi_location;
    for person in authorized {
      reader.grant(person.parse()?);
    }
    Ok(reader)
  }
}

pub struct RawAuthorization {
  pub person_number: String,
  pub reader_number: String,
}

impl RawAuthorization {
  pub fn into_authorization(self) -> Result<Authorization> {
    Ok(Authorization {
      person_number: self.person_number.parse()?,
      reader_number: self.reader_number.parse()?,
    })
  }
}
