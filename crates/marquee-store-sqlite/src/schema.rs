//! SQL schema for the Marquee SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The UNIQUE constraint on (source_venue_id, source_event_id) is the
/// authoritative duplicate guard for discovery-sourced shows; user-submitted
/// shows leave both columns NULL, which SQLite exempts from the constraint.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS shows (
    show_id              TEXT PRIMARY KEY,
    title                TEXT NOT NULL,
    starts_at            TEXT NOT NULL,   -- RFC 3339 UTC
    city                 TEXT,
    state                TEXT,
    description          TEXT,
    price                TEXT,
    age_requirement      TEXT,
    ticket_url           TEXT,
    image_url            TEXT,
    status               TEXT NOT NULL,   -- 'pending'|'approved'|'rejected'|'private'
    source               TEXT NOT NULL,   -- 'user_submitted'|'discovery_imported'
    source_venue_id      TEXT,
    source_event_id      TEXT,
    duplicate_of_show_id TEXT REFERENCES shows(show_id),
    slug                 TEXT NOT NULL UNIQUE,
    created_at           TEXT NOT NULL,
    UNIQUE (source_venue_id, source_event_id)
);

CREATE TABLE IF NOT EXISTS venues (
    venue_id   TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    city       TEXT NOT NULL,
    state      TEXT NOT NULL,
    address    TEXT,
    verified   INTEGER NOT NULL DEFAULT 0,
    slug       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS artists (
    artist_id  TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    slug       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS show_venues (
    show_id  TEXT NOT NULL REFERENCES shows(show_id),
    venue_id TEXT NOT NULL REFERENCES venues(venue_id),
    PRIMARY KEY (show_id, venue_id)
);

-- Position 0 is the headliner; openers follow in billing order.
CREATE TABLE IF NOT EXISTS show_artists (
    show_id   TEXT NOT NULL REFERENCES shows(show_id),
    artist_id TEXT NOT NULL REFERENCES artists(artist_id),
    position  INTEGER NOT NULL,
    set_type  TEXT NOT NULL,             -- 'headliner' | 'opener'
    PRIMARY KEY (show_id, artist_id),
    UNIQUE (show_id, position)
);

CREATE INDEX IF NOT EXISTS shows_starts_at_idx  ON shows(starts_at);
CREATE INDEX IF NOT EXISTS shows_source_key_idx ON shows(source_venue_id, source_event_id);
CREATE INDEX IF NOT EXISTS venues_identity_idx  ON venues(LOWER(name), LOWER(city));
CREATE INDEX IF NOT EXISTS artists_name_idx     ON artists(LOWER(name));

PRAGMA user_version = 1;
";
