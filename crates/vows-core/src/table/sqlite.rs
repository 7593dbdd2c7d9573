//! Guest table stored in a SQLite database file.
//!
//! Runtime defaults follow the projection database conventions:
//! - `journal_mode = WAL` so a reader never blocks on a writer
//! - `busy_timeout = 5s` to ride out short lock contention

use super::schema;
use super::{GuestInsert, GuestRow, GuestTable, GuestUpdate, TableError};
use crate::model::GuestId;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Busy timeout used for guest table connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "id, name, table_number, checked_in, vip, created_at, updated_at";

#[derive(Debug)]
pub struct SqliteTable {
    conn: Connection,
}

impl SqliteTable {
    /// Open (or create) the guest database at `path`, apply pragmas and
    /// create the schema if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if opening, configuring or creating the schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create guest db directory {}", parent.display()))?;
        }

        let mut conn = Connection::open(path)
            .with_context(|| format!("open guest database {}", path.display()))?;

        configure_connection(&conn).context("configure sqlite pragmas")?;
        ensure_schema(&mut conn).context("create guest table schema")?;

        Ok(Self { conn })
    }

    /// Open a private in-memory database with the current schema.
    ///
    /// # Errors
    ///
    /// Returns an error if creating the schema fails.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().context("open in-memory guest database")?;
        ensure_schema(&mut conn).context("create guest table schema")?;
        Ok(Self { conn })
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Read `PRAGMA user_version` as a `u32`.
///
/// # Errors
///
/// Returns an error if the query fails or the value is out of range.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
    })
}

/// Create the guests table on a fresh database and stamp
/// [`schema::SCHEMA_VERSION`]. A database already stamped is left alone.
///
/// # Errors
///
/// Returns an error if the version query or the schema creation fails.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<u32> {
    let current = current_schema_version(conn)?;
    if current >= schema::SCHEMA_VERSION {
        return Ok(current);
    }

    let tx = conn.transaction()?;
    tx.execute_batch(schema::SCHEMA_SQL)?;
    tx.pragma_update(None, "user_version", i64::from(schema::SCHEMA_VERSION))?;
    tx.commit()?;
    Ok(schema::SCHEMA_VERSION)
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error)))
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<GuestRow> {
    Ok(GuestRow {
        id: row.get(0)?,
        name: row.get(1)?,
        table_number: row.get(2)?,
        checked_in: row.get(3)?,
        vip: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
    })
}

fn fetch_row(conn: &Connection, id: GuestId) -> rusqlite::Result<Option<GuestRow>> {
    conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM guests WHERE id = ?1"),
        [id],
        map_row,
    )
    .optional()
}

impl GuestTable for SqliteTable {
    fn select_all(&mut self) -> Result<Vec<GuestRow>, TableError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM guests ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn insert(&mut self, rows: &[GuestInsert]) -> Result<Vec<GuestRow>, TableError> {
        let now = timestamp(Utc::now());
        let tx = self.conn.transaction()?;
        let mut inserted = Vec::with_capacity(rows.len());

        for row in rows {
            match row.checked_in {
                Some(checked_in) => tx.execute(
                    "INSERT INTO guests (name, table_number, vip, checked_in, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    params![row.name, row.table_number, row.vip, checked_in, now],
                )?,
                None => tx.execute(
                    "INSERT INTO guests (name, table_number, vip, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![row.name, row.table_number, row.vip, now],
                )?,
            };
            let id = tx.last_insert_rowid();
            let stored = fetch_row(&tx, id)?.ok_or(TableError::RowCountMismatch {
                requested: rows.len(),
                returned: inserted.len(),
            })?;
            inserted.push(stored);
        }

        tx.commit()?;
        debug!(count = inserted.len(), "inserted guest rows");
        Ok(inserted)
    }

    fn delete(&mut self, id: GuestId) -> Result<(), TableError> {
        let removed = self.conn.execute("DELETE FROM guests WHERE id = ?1", [id])?;
        debug!(id, removed, "deleted guest row");
        Ok(())
    }

    fn update(&mut self, id: GuestId, update: &GuestUpdate) -> Result<(), TableError> {
        let changed = self.conn.execute(
            "UPDATE guests SET checked_in = COALESCE(?1, checked_in), updated_at = ?2 WHERE id = ?3",
            params![update.checked_in, timestamp(update.updated_at), id],
        )?;
        debug!(id, changed, "updated guest row");
        Ok(())
    }
}
