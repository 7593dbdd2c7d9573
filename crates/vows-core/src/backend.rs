//! Persistence adapters for the guest store.
//!
//! A [`Backend`] is chosen when the store is wired up:
//!
//! - [`LocalBackend`] keeps the whole list as one JSON value in a slot. It
//!   assigns ids itself (largest id + 1) and rewrites the slot after every
//!   change.
//! - [`RemoteBackend`] talks to a guest table. The table assigns ids and
//!   each change is a single row operation; there is no snapshot to write.

use crate::error::ErrorCode;
use crate::model::ids::{assign_ids, max_id};
use crate::model::seed::default_guests;
use crate::model::{Guest, GuestDraft, GuestId};
use crate::storage::{DEFAULT_SLOT_KEY, SlotStore, StorageError};
use crate::table::{GuestInsert, GuestTable, GuestUpdate, TableError};
use crate::validate::{ValidationError, parse_guest_list};
use chrono::Utc;

/// Any failure a backend can report to the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    InvalidData(#[from] ValidationError),

    #[error("failed to serialize guest list: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("no guest ids left after {max}")]
    IdsExhausted { max: GuestId },
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Storage(err) => err.code(),
            Self::InvalidData(err) => err.code(),
            Self::Serialize(_) => ErrorCode::StorageWriteFailed,
            Self::Table(err) => err.code(),
            Self::IdsExhausted { .. } => ErrorCode::IdSpaceExhausted,
        }
    }
}

/// Which persistence strategy a backend implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Whole-list snapshot in a local slot; every call completes immediately.
    Local,
    /// Row operations against a table; calls may be slow or fail.
    Remote,
}

impl BackendKind {
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Remote)
    }
}

/// Persistence capability behind a [`GuestStore`](crate::store::GuestStore).
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Collection shown before (or instead of) a successful load.
    fn seed(&self) -> Vec<Guest>;

    /// Fetch the stored collection. `Ok(None)` means nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored value is invalid.
    fn load(&mut self) -> Result<Option<Vec<Guest>>, StoreError>;

    /// Create guests for `drafts`, given the current collection.
    /// Returns the created guests in draft order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the batch; nothing is created.
    fn insert(
        &mut self,
        existing: &[Guest],
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, StoreError>;

    /// Create a single guest.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the guest.
    fn insert_one(&mut self, existing: &[Guest], draft: GuestDraft) -> Result<Guest, StoreError> {
        self.insert(existing, vec![draft])?
            .pop()
            .ok_or(StoreError::Table(TableError::RowCountMismatch {
                requested: 1,
                returned: 0,
            }))
    }

    /// Delete the guest with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn delete(&mut self, id: GuestId) -> Result<(), StoreError>;

    /// Record a new check-in value for the guest with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn set_checked_in(&mut self, id: GuestId, checked_in: bool) -> Result<(), StoreError>;

    /// Write the full collection after a change.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn persist(&mut self, guests: &[Guest]) -> Result<(), StoreError>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn seed(&self) -> Vec<Guest> {
        (**self).seed()
    }

    fn load(&mut self) -> Result<Option<Vec<Guest>>, StoreError> {
        (**self).load()
    }

    fn insert(
        &mut self,
        existing: &[Guest],
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, StoreError> {
        (**self).insert(existing, drafts)
    }

    fn insert_one(&mut self, existing: &[Guest], draft: GuestDraft) -> Result<Guest, StoreError> {
        (**self).insert_one(existing, draft)
    }

    fn delete(&mut self, id: GuestId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn set_checked_in(&mut self, id: GuestId, checked_in: bool) -> Result<(), StoreError> {
        (**self).set_checked_in(id, checked_in)
    }

    fn persist(&mut self, guests: &[Guest]) -> Result<(), StoreError> {
        (**self).persist(guests)
    }
}

/// Snapshot persistence in a [`SlotStore`].
#[derive(Debug, Clone)]
pub struct LocalBackend<S> {
    slots: S,
    key: String,
    seed: Vec<Guest>,
}

impl<S: SlotStore> LocalBackend<S> {
    /// Store under [`DEFAULT_SLOT_KEY`] with the sample guests as seed.
    #[must_use]
    pub fn new(slots: S) -> Self {
        Self {
            slots,
            key: DEFAULT_SLOT_KEY.to_string(),
            seed: default_guests(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Vec<Guest>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn slots(&self) -> &S {
        &self.slots
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: SlotStore> Backend for LocalBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn seed(&self) -> Vec<Guest> {
        self.seed.clone()
    }

    fn load(&mut self) -> Result<Option<Vec<Guest>>, StoreError> {
        match self.slots.read(&self.key)? {
            Some(raw) => Ok(Some(parse_guest_list(&raw)?)),
            None => Ok(None),
        }
    }

    fn insert(
        &mut self,
        existing: &[Guest],
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, StoreError> {
        assign_ids(existing, drafts).ok_or_else(|| StoreError::IdsExhausted {
            max: max_id(existing),
        })
    }

    fn delete(&mut self, _id: GuestId) -> Result<(), StoreError> {
        Ok(())
    }

    fn set_checked_in(&mut self, _id: GuestId, _checked_in: bool) -> Result<(), StoreError> {
        Ok(())
    }

    fn persist(&mut self, guests: &[Guest]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(guests)?;
        self.slots.write(&self.key, &raw)?;
        Ok(())
    }
}

/// Row-level persistence in a [`GuestTable`].
#[derive(Debug, Clone)]
pub struct RemoteBackend<T> {
    table: T,
}

impl<T: GuestTable> RemoteBackend<T> {
    #[must_use]
    pub const fn new(table: T) -> Self {
        Self { table }
    }

    #[must_use]
    pub const fn table(&self) -> &T {
        &self.table
    }
}

impl<T: GuestTable> Backend for RemoteBackend<T> {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn seed(&self) -> Vec<Guest> {
        Vec::new()
    }

    fn load(&mut self) -> Result<Option<Vec<Guest>>, StoreError> {
        let rows = self.table.select_all()?;
        Ok(Some(rows.into_iter().map(Guest::from).collect()))
    }

    fn insert(
        &mut self,
        _existing: &[Guest],
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, StoreError> {
        let rows: Vec<GuestInsert> = drafts.iter().map(GuestInsert::from).collect();
        let inserted = self.table.insert(&rows)?;
        Ok(inserted.into_iter().map(Guest::from).collect())
    }

    fn delete(&mut self, id: GuestId) -> Result<(), StoreError> {
        self.table.delete(id)?;
        Ok(())
    }

    fn set_checked_in(&mut self, id: GuestId, checked_in: bool) -> Result<(), StoreError> {
        self.table
            .update(id, &GuestUpdate::check_in(checked_in, Utc::now()))?;
        Ok(())
    }

    fn persist(&mut self, _guests: &[Guest]) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlotStore;
    use crate::table::MemoryTable;

    fn draft(name: &str) -> GuestDraft {
        GuestDraft::new(name, "", false).expect("draft")
    }

    #[test]
    fn local_missing_slot_loads_as_none() {
        let mut backend = LocalBackend::new(MemorySlotStore::new());
        assert!(backend.load().expect("load").is_none());
        assert_eq!(backend.seed().len(), 6);
    }

    #[test]
    fn local_invalid_slot_is_an_error() {
        let slots = MemorySlotStore::new().with_slot(DEFAULT_SLOT_KEY, r#"[{"id": "1"}]"#);
        let err = LocalBackend::new(slots).load().expect_err("invalid");
        assert!(matches!(err, StoreError::InvalidData(_)));
        assert_eq!(err.code(), ErrorCode::InvalidGuestData);
    }

    #[test]
    fn local_insert_uses_max_plus_one() {
        let mut backend = LocalBackend::new(MemorySlotStore::new()).with_seed(Vec::new());
        let existing = default_guests();
        let guest = backend.insert_one(&existing, draft("Zara")).expect("insert");
        assert_eq!(guest.id, 7);
    }

    #[test]
    fn local_insert_past_largest_id_is_an_error() {
        let mut backend = LocalBackend::new(MemorySlotStore::new());
        let mut last = default_guests().remove(0);
        last.id = GuestId::MAX;
        let err = backend
            .insert(&[last], vec![draft("Zara")])
            .expect_err("no ids left");
        assert!(matches!(err, StoreError::IdsExhausted { max } if max == GuestId::MAX));
        assert_eq!(err.code(), ErrorCode::IdSpaceExhausted);
    }

    #[test]
    fn local_persist_writes_slot_under_key() {
        let mut backend = LocalBackend::new(MemorySlotStore::new()).with_key("weddingGuests");
        backend.persist(&default_guests()).expect("persist");
        let raw = backend.slots().get("weddingGuests").expect("slot written");
        assert_eq!(parse_guest_list(raw).expect("valid"), default_guests());
    }

    #[test]
    fn remote_insert_uses_table_ids() {
        let mut backend = RemoteBackend::new(MemoryTable::new());
        let created = backend
            .insert(&default_guests(), vec![draft("A"), draft("B")])
            .expect("insert");
        let ids: Vec<_> = created.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(backend.table().rows().len(), 2);
    }

    #[test]
    fn remote_set_checked_in_updates_row() {
        let mut backend = RemoteBackend::new(MemoryTable::new());
        let guest = backend.insert_one(&[], draft("A")).expect("insert");
        backend.set_checked_in(guest.id, true).expect("update");
        assert!(backend.table().rows()[0].checked_in);
    }

    #[test]
    fn boxed_backend_delegates() {
        let mut backend: Box<dyn Backend> = Box::new(RemoteBackend::new(MemoryTable::new()));
        assert!(backend.kind().is_remote());
        assert!(backend.seed().is_empty());
        assert_eq!(backend.load().expect("load"), Some(Vec::new()));
    }
}
