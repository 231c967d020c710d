//! SQL schema for the Doorlist SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_number TEXT PRIMARY KEY,
    first_name    TEXT,
    last_name     TEXT,
    card_number   TEXT,
    email         TEXT
);

-- reader_number is stored zero-padded, e.g. '00012'.
CREATE TABLE IF NOT EXISTS readers (
    reader_number      TEXT PRIMARY KEY,
    location_blueprint TEXT,   -- always in normalized form
    location_hospital  TEXT,
    location_name      TEXT,
    abi_location       TEXT
);

-- One row per (person, reader) edge; replays are absorbed by the key.
CREATE TABLE IF NOT EXISTS authorizations (
    person_number TEXT NOT NULL REFERENCES people(person_number),
    reader_number TEXT NOT NULL REFERENCES readers(reader_number),
    PRIMARY KEY (person_number, reader_number)
);

CREATE INDEX IF NOT EXISTS authorizations_reader_idx ON authorizations(reader_number);

PRAGMA user_version = 1;
";
