//! String-keyed slot storage backing the local guest list.
//!
//! A slot holds one serialized value. Reads return `None` for a slot that was
//! never written; writes overwrite the previous value in full.

pub mod file;
pub mod memory;

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;

use crate::error::ErrorCode;
use crate::lock::LockError;
use std::io;
use std::path::PathBuf;

/// Slot key the guest list is stored under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "guestList";

/// Failures reading or writing a slot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read slot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write slot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid slot key {key:?}: keys are non-empty and contain only [A-Za-z0-9_-]")]
    InvalidKey { key: String },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("slot storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::StorageReadFailed,
            Self::Write { .. } | Self::Unavailable(_) => ErrorCode::StorageWriteFailed,
            Self::InvalidKey { .. } => ErrorCode::ConfigParseError,
            Self::Lock(err) => err.code(),
        }
    }
}

/// Key/value storage for serialized slots.
pub trait SlotStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_rules() {
        assert!(check_key(DEFAULT_SLOT_KEY).is_ok());
        assert!(check_key("guest-list_2").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("../escape").is_err());
        assert!(check_key("a b").is_err());
    }

    #[test]
    fn error_codes() {
        let err = StorageError::InvalidKey { key: String::new() };
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
        let err = StorageError::Unavailable("quota exceeded".into());
        assert_eq!(err.code(), ErrorCode::StorageWriteFailed);
    }
}
