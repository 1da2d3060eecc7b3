//! SQL schema for the cinedex SQLite store.
//!
//! Executed once at connection startup, and again (after [`DROP_TABLES`]) on
//! every reset.

/// Connection-level settings.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Table DDL. Every statement is `IF NOT EXISTS`, so reapplying is a no-op.
pub const TABLES: &str = "
-- Two movies may share title and year when their directors differ.
-- `title` is the lowercased identity form; `display_title` is as authored.
CREATE TABLE IF NOT EXISTS movie (
    movie_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT    NOT NULL,
    display_title TEXT    NOT NULL,
    year          INTEGER NOT NULL,
    director_ids  TEXT    NOT NULL CHECK (director_ids <> ''),  -- '3:1:7'
    UNIQUE (title, year, director_ids)
);

-- `*_key` columns hold the lowercased identity pair, folded outside SQLite
-- so non-ASCII letters compare case-insensitively too. The name columns keep
-- the first spelling seen.
CREATE TABLE IF NOT EXISTS person (
    person_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name     TEXT NOT NULL,
    last_name      TEXT NOT NULL,
    first_name_key TEXT NOT NULL,
    last_name_key  TEXT NOT NULL,
    UNIQUE (first_name_key, last_name_key)
);

-- No uniqueness: the same link may be appended twice.
CREATE TABLE IF NOT EXISTS movie_person (
    movie_person_id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id        INTEGER NOT NULL REFERENCES movie(movie_id),
    person_id       INTEGER NOT NULL REFERENCES person(person_id),
    role            TEXT    NOT NULL CHECK (role IN ('d', 'a'))
);

CREATE INDEX IF NOT EXISTS movie_title_idx         ON movie(title, year);
CREATE INDEX IF NOT EXISTS movie_person_movie_idx  ON movie_person(movie_id, role);
CREATE INDEX IF NOT EXISTS movie_person_person_idx ON movie_person(person_id, role);

PRAGMA user_version = 2;
";

/// Children first so foreign keys never dangle.
pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS movie_person;
DROP TABLE IF EXISTS movie;
DROP TABLE IF EXISTS person;
";
