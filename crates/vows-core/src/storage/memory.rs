use super::{SlotStore, StorageError, check_key};
use std::collections::HashMap;

/// In-process slot store. Values live as long as the store.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
}

impl MemorySlotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, e.g. with a list saved by an earlier session.
    #[must_use]
    pub fn with_slot(mut self, key: &str, value: impl Into<String>) -> Self {
        self.slots.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_roundtrip() {
        let mut store = MemorySlotStore::new();
        assert_eq!(store.read("guestList").expect("read"), None);
        store.write("guestList", "[]").expect("write");
        assert_eq!(store.get("guestList"), Some("[]"));
    }

    #[test]
    fn with_slot_prepopulates() {
        let store = MemorySlotStore::new().with_slot("guestList", "[1]");
        assert_eq!(store.read("guestList").expect("read").as_deref(), Some("[1]"));
    }
}
