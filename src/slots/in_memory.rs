//! InMemorySlotStore - Vec-backed slot store for testing and development.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use uuid::Uuid;

use super::{AvailableTime, NewSlot, SlotKey, SlotStore, StoreError};

/// Internal stored representation of a slot document.
///
/// Documents are kept serialized, so whatever was written is decoded again on
/// every read, the same way a document store behaves.
struct StoredSlot {
    id: String,
    dentist_id: Option<String>,
    key: Option<SlotKey>,
    bytes: Vec<u8>,
}

/// In-memory slot store.
///
/// Iteration order is insertion order. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemorySlotStore {
    storage: Arc<RwLock<Vec<StoredSlot>>>,
}

impl Default for InMemorySlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySlotStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Store an arbitrary JSON document as-is, bypassing every check.
    ///
    /// Stands in for legacy or migrated-in data. Uses the document's `id`
    /// field when it is a string, otherwise assigns one. Returns the id.
    pub fn insert_raw(&self, document: Value) -> Result<String, StoreError> {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(new_id);
        let dentist_id = document
            .get("dentist_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let key = match (
            &dentist_id,
            document.get("start_time").and_then(Value::as_i64),
            document.get("end_time").and_then(Value::as_i64),
        ) {
            (Some(dentist_id), Some(start_time), Some(end_time)) => Some(SlotKey {
                dentist_id: dentist_id.clone(),
                start_time,
                end_time,
            }),
            _ => None,
        };
        let bytes = serde_json::to_vec(&document).map_err(|e| StoreError::Decode(e.to_string()))?;

        self.storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?
            .push(StoredSlot {
                id: id.clone(),
                dentist_id,
                key,
                bytes,
            });

        Ok(id)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode every stored document (test helper).
    pub fn all(&self) -> Result<Vec<AvailableTime>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        storage.iter().map(decode).collect()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn decode(stored: &StoredSlot) -> Result<AvailableTime, StoreError> {
    serde_json::from_slice(&stored.bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

impl SlotStore for InMemorySlotStore {
    fn insert(&self, slot: &NewSlot) -> Result<String, StoreError> {
        let key = slot.key();
        let stored = slot.clone().with_id(new_id());
        let bytes = serde_json::to_vec(&stored).map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        // Checked under the write lock: this is the unique index.
        if storage.iter().any(|s| s.key.as_ref() == Some(&key)) {
            return Err(StoreError::Duplicate(key));
        }

        storage.push(StoredSlot {
            id: stored.id.clone(),
            dentist_id: Some(stored.dentist_id.clone()),
            key: Some(key),
            bytes,
        });

        Ok(stored.id)
    }

    fn find_by_dentist(&self, dentist_id: &str) -> Result<Vec<AvailableTime>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        storage
            .iter()
            .filter(|s| s.dentist_id.as_deref() == Some(dentist_id))
            .map(decode)
            .collect()
    }

    fn count_matching(&self, key: &SlotKey) -> Result<u64, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(storage.iter().filter(|s| s.key.as_ref() == Some(key)).count() as u64)
    }

    fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match storage.iter().position(|s| s.id == id) {
            Some(index) => {
                storage.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
