pub mod guest;
pub mod ids;
pub mod seed;

pub use guest::{DraftError, Guest, GuestDraft, GuestId, UNASSIGNED_TABLE};
