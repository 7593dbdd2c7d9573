//! Identifier assignment for the local snapshot variant.
//!
//! Ids are recomputed from the current collection on every add: the next id
//! is the largest id present plus one, or 1 for an empty collection. Removed
//! ids are never handed out again while a larger id exists. This is only
//! sound with a single writer.

use super::guest::{Guest, GuestDraft, GuestId};

/// Largest id present, or 0 for an empty collection.
#[must_use]
pub fn max_id(guests: &[Guest]) -> GuestId {
    guests.iter().map(|g| g.id).fold(0, GuestId::max)
}

/// The id the next added guest will receive, or `None` once the largest id
/// is already `GuestId::MAX`.
#[must_use]
pub fn next_id(guests: &[Guest]) -> Option<GuestId> {
    max_id(guests).checked_add(1)
}

/// Turn drafts into guests with a contiguous block of ids starting at
/// [`next_id`] of `existing`.
///
/// Returns `None` if the block would run past `GuestId::MAX`; no guest is
/// produced in that case.
#[must_use]
pub fn assign_ids(existing: &[Guest], drafts: Vec<GuestDraft>) -> Option<Vec<Guest>> {
    let mut id = max_id(existing);
    drafts
        .into_iter()
        .map(|draft| {
            id = id.checked_add(1)?;
            Some(Guest::from_draft(id, draft))
        })
        .collect()
}
