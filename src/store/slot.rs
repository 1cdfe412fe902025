// pwmsg — Storage slot abstraction
//
// The store only ever needs whole-value reads and writes against one key.

use std::cell::RefCell;
use std::collections::HashMap;

use super::StoreError;

/// A string-keyed durable slot holding one serialized value per key.
pub trait SlotStorage {
    /// Read the value stored under `key`, or `None` when the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: SlotStorage + ?Sized> SlotStorage for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

impl<T: SlotStorage + ?Sized> SlotStorage for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// Non-durable slots, used in tests and for throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySlots {
    map: RefCell<HashMap<String, String>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
