//! SQLite schema for the guest table.
//!
//! Mirrors the remote table: backend-assigned integer ids, a text table
//! label defaulting to `Unassigned`, boolean check-in and VIP flags, and
//! creation/modification timestamps stored as RFC 3339 text (UTC,
//! microsecond precision) so lexical order matches time order.

/// Current schema version, stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// The guests table and its select-all ordering index.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS guests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    table_number TEXT NOT NULL DEFAULT 'Unassigned',
    checked_in INTEGER NOT NULL DEFAULT 0 CHECK (checked_in IN (0, 1)),
    vip INTEGER NOT NULL DEFAULT 0 CHECK (vip IN (0, 1)),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_guests_created_at ON guests(created_at, id);
";

/// Indexes the schema must provide.
pub const REQUIRED_INDEXES: &[&str] = &["idx_guests_created_at"];
