//! Guest records and the validated input used to create them.

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a guest, unique within one collection.
pub type GuestId = i64;

/// Table label stored when no table was given.
pub const UNASSIGNED_TABLE: &str = "Unassigned";

/// One invited person.
///
/// Serializes to the local slot shape:
/// `{"id": 1, "name": "...", "table": "...", "checkedIn": false, "vip": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub table: String,
    pub checked_in: bool,
    pub vip: bool,
}

impl Guest {
    /// Materialize a draft under the given id. New guests have not arrived yet.
    #[must_use]
    pub fn from_draft(id: GuestId, draft: GuestDraft) -> Self {
        Self {
            id,
            name: draft.name,
            table: draft.table,
            checked_in: false,
            vip: draft.vip,
        }
    }
}

impl fmt::Display for Guest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} (table {})", self.id, self.name, self.table)
    }
}

/// Rejected guest input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("guest name must not be blank")]
    BlankName,
}

impl DraftError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidDraft
    }
}

/// Validated details for a guest that does not exist yet.
///
/// The name is trimmed and non-empty; the table is trimmed and falls back to
/// [`UNASSIGNED_TABLE`] when blank. The id and check-in state are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestDraft {
    name: String,
    table: String,
    vip: bool,
}

impl GuestDraft {
    /// Build a draft from raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::BlankName`] when `name` is empty after trimming.
    pub fn new(name: &str, table: &str, vip: bool) -> Result<Self, DraftError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::BlankName);
        }
        Ok(Self {
            name: name.to_string(),
            table: normalize_table(table),
            vip,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn vip(&self) -> bool {
        self.vip
    }
}

/// Trim a table label, substituting [`UNASSIGNED_TABLE`] for blank input.
#[must_use]
pub fn normalize_table(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNASSIGNED_TABLE.to_string()
    } else {
        trimmed.to_string()
    }
}
