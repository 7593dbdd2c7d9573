//! The guest store: single source of truth for the guest collection.
//!
//! The store owns the in-memory list, mediates every mutation, and keeps a
//! [`Backend`] in step with it. All backend failures are caught here and
//! turned into a user-facing message in a single error slot; none escape to
//! the caller.
//!
//! # Optimistic updates
//!
//! With a remote backend, remove and toggle apply to the in-memory list and
//! notify subscribers *before* the backend call. On failure the store puts
//! back the exact pre-mutation list (remove) or flips the flag back
//! (toggle), records an error, and notifies again. Adds are never
//! optimistic: only rows the backend confirms are appended.
//!
//! With a local backend every mutation applies immediately and the whole
//! list is then written to the slot. A failed write keeps the in-memory
//! list and records an error.

use crate::backend::{Backend, BackendKind, StoreError};
use crate::model::{Guest, GuestDraft, GuestId, ids};
use crate::view::Stats;
use tracing::{debug, error, info, warn};

pub const LOAD_LOCAL_FAILED: &str = "Failed to load saved guest list";
pub const LOAD_REMOTE_FAILED: &str = "Failed to load guest list";
pub const SAVE_FAILED: &str = "Failed to save guest list";
pub const ADD_FAILED: &str = "Failed to add guest";
pub const IMPORT_FAILED: &str = "Failed to import guests";
pub const REMOVE_FAILED: &str = "Failed to remove guest";
pub const TOGGLE_FAILED: &str = "Failed to update check-in status";

/// Result of a store mutation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The change is applied and confirmed by the backend.
    Applied(T),
    /// Nothing to do (unknown id, empty batch). The error slot is untouched.
    Skipped,
    /// The backend refused; the list is back at its pre-mutation state and
    /// the error slot holds the reason.
    Failed,
}

impl<T> Outcome<T> {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Skipped | Self::Failed => None,
        }
    }
}

/// Borrowed view of the store handed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub guests: &'a [Guest],
    pub initialized: bool,
    pub loading: bool,
    pub error: Option<&'a str>,
}

impl Snapshot<'_> {
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::of(self.guests)
    }
}

/// Handle returned by [`GuestStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Snapshot<'_>)>;

pub struct GuestStore<B: Backend> {
    backend: B,
    guests: Vec<Guest>,
    initialized: bool,
    loading: bool,
    error: Option<String>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<B: Backend> std::fmt::Debug for GuestStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestStore")
            .field("kind", &self.backend.kind())
            .field("guests", &self.guests.len())
            .field("initialized", &self.initialized)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<B: Backend> GuestStore<B> {
    /// Create an unloaded store showing the backend's seed collection.
    pub fn new(backend: B) -> Self {
        let guests = backend.seed();
        Self {
            backend,
            guests,
            initialized: false,
            loading: false,
            error: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and run the initial load.
    pub fn open(backend: B) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    // ── read model ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    #[must_use]
    pub fn get(&self, id: GuestId) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Latest user-facing error, if the last operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::of(&self.guests)
    }

    /// The id the next locally-added guest would receive, or `None` when
    /// the largest id leaves no room.
    #[must_use]
    pub fn next_id(&self) -> Option<GuestId> {
        ids::next_id(&self.guests)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            guests: &self.guests,
            initialized: self.initialized,
            loading: self.loading,
            error: self.error.as_deref(),
        }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Tear the store down and hand back its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Register a callback invoked after every state change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Dismiss the current error message.
    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.notify();
        }
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    /// Fetch the stored collection. Runs once; later calls are ignored.
    ///
    /// Local: a missing slot keeps the seed; an unreadable or invalid slot
    /// keeps the seed and records an error. Remote: a failed fetch leaves
    /// the list empty and records an error. Either way the store is
    /// initialized afterwards.
    pub fn load(&mut self) {
        if self.initialized {
            debug!("guest store already loaded");
            return;
        }

        let kind = self.backend.kind();
        if kind.is_remote() {
            self.loading = true;
            self.notify();
        }

        match self.backend.load() {
            Ok(Some(guests)) => {
                info!(count = guests.len(), ?kind, "guest list loaded");
                self.guests = guests;
            }
            Ok(None) => {
                debug!(count = self.guests.len(), "no saved guest list, keeping seed");
            }
            Err(err) => {
                let message = match kind {
                    BackendKind::Local => LOAD_LOCAL_FAILED,
                    BackendKind::Remote => LOAD_REMOTE_FAILED,
                };
                warn!(code = %err.code(), error = %err, "{message}, falling back");
                self.guests = self.backend.seed();
                self.error = Some(message.to_string());
            }
        }

        self.initialized = true;
        self.loading = false;
        self.notify();
    }

    // ── mutations ───────────────────────────────────────────────────────────

    /// Add one guest. The guest starts not checked in.
    pub fn add_guest(&mut self, draft: GuestDraft) -> Outcome<Guest> {
        match self.backend.insert_one(&self.guests, draft) {
            Ok(guest) => {
                debug!(id = guest.id, name = %guest.name, "guest added");
                self.guests.push(guest.clone());
                self.commit();
                Outcome::Applied(guest)
            }
            Err(err) => self.fail(&err, ADD_FAILED),
        }
    }

    /// Add a batch of guests (e.g. from an import). The whole batch is
    /// applied or none of it is.
    pub fn add_guests(&mut self, drafts: Vec<GuestDraft>) -> Outcome<Vec<Guest>> {
        if drafts.is_empty() {
            debug!("empty guest batch, nothing to add");
            return Outcome::Skipped;
        }

        let requested = drafts.len();
        match self.backend.insert(&self.guests, drafts) {
            Ok(added) => {
                info!(requested, added = added.len(), "guest batch added");
                self.guests.extend(added.iter().cloned());
                self.commit();
                Outcome::Applied(added)
            }
            Err(err) => self.fail(&err, IMPORT_FAILED),
        }
    }

    /// Remove the guest with `id`. An unknown id is a no-op.
    pub fn remove_guest(&mut self, id: GuestId) -> Outcome<Guest> {
        let Some(index) = self.guests.iter().position(|g| g.id == id) else {
            debug!(id, "remove: no such guest");
            return Outcome::Skipped;
        };

        let before = self.guests.clone();
        let removed = self.guests.remove(index);
        self.show_optimistic();

        match self.backend.delete(id) {
            Ok(()) => {
                debug!(id, "guest removed");
                self.commit();
                Outcome::Applied(removed)
            }
            Err(err) => {
                self.guests = before;
                self.fail(&err, REMOVE_FAILED)
            }
        }
    }

    /// Flip the check-in flag of the guest with `id` and return the new
    /// value. An unknown id is a no-op.
    pub fn toggle_check_in(&mut self, id: GuestId) -> Outcome<bool> {
        let Some(guest) = self.guests.iter_mut().find(|g| g.id == id) else {
            debug!(id, "toggle: no such guest");
            return Outcome::Skipped;
        };

        let checked_in = !guest.checked_in;
        guest.checked_in = checked_in;
        self.show_optimistic();

        match self.backend.set_checked_in(id, checked_in) {
            Ok(()) => {
                debug!(id, checked_in, "check-in updated");
                self.commit();
                Outcome::Applied(checked_in)
            }
            Err(err) => {
                if let Some(guest) = self.guests.iter_mut().find(|g| g.id == id) {
                    guest.checked_in = !checked_in;
                }
                self.fail(&err, TOGGLE_FAILED)
            }
        }
    }

    // ── internals ───────────────────────────────────────────────────────────

    /// Publish the tentative state while a remote call is outstanding.
    fn show_optimistic(&mut self) {
        if self.backend.kind().is_remote() {
            self.notify();
        }
    }

    /// A mutation succeeded: clear the error, write through, notify.
    fn commit(&mut self) {
        self.error = None;
        if self.initialized {
            if let Err(err) = self.backend.persist(&self.guests) {
                error!(code = %err.code(), error = %err, "{SAVE_FAILED}");
                self.error = Some(SAVE_FAILED.to_string());
            }
        }
        self.notify();
    }

    /// A mutation failed and its state is already restored.
    fn fail<T>(&mut self, err: &StoreError, message: &str) -> Outcome<T> {
        error!(code = %err.code(), error = %err, "{message}");
        self.error = Some(message.to_string());
        self.notify();
        Outcome::Failed
    }

    fn notify(&mut self) {
        let snapshot = Snapshot {
            guests: &self.guests,
            initialized: self.initialized,
            loading: self.loading,
            error: self.error.as_deref(),
        };
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }
}
