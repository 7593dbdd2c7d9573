//! Relational guest table backends.
//!
//! A table stores one row per guest with backend-assigned identifiers and
//! creation/modification timestamps. Two implementations exist: a SQLite
//! file ([`sqlite::SqliteTable`]) and a PostgREST-style HTTP API
//! ([`rest::RestTable`]). [`memory::MemoryTable`] is an in-process stand-in.

pub mod memory;
pub mod rest;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryTable;
pub use rest::{RestConfig, RestTable};
pub use sqlite::SqliteTable;

use crate::error::ErrorCode;
use crate::model::guest::normalize_table;
use crate::model::{Guest, GuestDraft, GuestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored row, as returned by select and insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRow {
    pub id: GuestId,
    pub name: String,
    pub table_number: String,
    pub checked_in: bool,
    pub vip: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            table: normalize_table(&row.table_number),
            checked_in: row.checked_in,
            vip: row.vip,
        }
    }
}

/// Insert payload. `checked_in` is omitted when `None` so the backend
/// default (not arrived) applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestInsert {
    pub name: String,
    pub table_number: String,
    pub vip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in: Option<bool>,
}

impl From<&GuestDraft> for GuestInsert {
    fn from(draft: &GuestDraft) -> Self {
        Self {
            name: draft.name().to_string(),
            table_number: draft.table().to_string(),
            vip: draft.vip(),
            checked_in: None,
        }
    }
}

/// Partial update payload; the modification timestamp is always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl GuestUpdate {
    #[must_use]
    pub const fn check_in(checked_in: bool, updated_at: DateTime<Utc>) -> Self {
        Self {
            checked_in: Some(checked_in),
            updated_at,
        }
    }
}

/// Failures talking to a guest table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("backend returned {returned} rows for {requested} inserted guests")]
    RowCountMismatch { requested: usize, returned: usize },

    #[error("guest table unavailable: {0}")]
    Unavailable(String),
}

impl TableError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Sqlite(_) => ErrorCode::TableQueryFailed,
            Self::Transport { .. } | Self::Status { .. } | Self::Unavailable(_) => {
                ErrorCode::RemoteRequestFailed
            }
            Self::Decode { .. } | Self::RowCountMismatch { .. } => {
                ErrorCode::RemoteResponseInvalid
            }
        }
    }
}

/// Operations a relational guest table supports.
pub trait GuestTable {
    /// Every row, oldest first (`created_at` ascending, then id).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn select_all(&mut self) -> Result<Vec<GuestRow>, TableError>;

    /// Insert rows and return them as stored, with backend-assigned ids, in
    /// input order. The batch is applied entirely or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if any row cannot be inserted.
    fn insert(&mut self, rows: &[GuestInsert]) -> Result<Vec<GuestRow>, TableError>;

    /// Delete the row with `id`. Deleting a missing id succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn delete(&mut self, id: GuestId) -> Result<(), TableError>;

    /// Apply a partial update to the row with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn update(&mut self, id: GuestId, update: &GuestUpdate) -> Result<(), TableError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNASSIGNED_TABLE;

    fn row(table_number: &str) -> GuestRow {
        let now = Utc::now();
        GuestRow {
            id: 12,
            name: "Zara".into(),
            table_number: table_number.into(),
            checked_in: false,
            vip: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_guest() {
        let guest = Guest::from(row("5"));
        assert_eq!(guest.id, 12);
        assert_eq!(guest.table, "5");
        assert!(guest.vip);
    }

    #[test]
    fn blank_table_number_reads_as_unassigned() {
        assert_eq!(Guest::from(row("")).table, UNASSIGNED_TABLE);
    }

    #[test]
    fn insert_omits_checked_in_by_default() {
        let draft = GuestDraft::new("Zara", "5", false).expect("draft");
        let json = serde_json::to_value(GuestInsert::from(&draft)).expect("serialize");
        assert!(json.get("checked_in").is_none());
        assert_eq!(json["table_number"], "5");
    }

    #[test]
    fn update_carries_flag_and_timestamp() {
        let update = GuestUpdate::check_in(true, Utc::now());
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["checked_in"], true);
        assert!(json["updated_at"].is_string());
    }

    #[test]
    fn error_codes() {
        let err = TableError::RowCountMismatch {
            requested: 2,
            returned: 1,
        };
        assert_eq!(err.code(), ErrorCode::RemoteResponseInvalid);
        assert_eq!(
            TableError::Unavailable("down".into()).code(),
            ErrorCode::RemoteRequestFailed
        );
    }
}
