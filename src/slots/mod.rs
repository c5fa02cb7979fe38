//! Slots - the available time entity and its store.
//!
//! An [`AvailableTime`] is a bounded interval owned by a dentist. The store
//! is a single collection of these documents behind the [`SlotStore`] trait.
//!
//! ## Example
//!
//! ```
//! use availability_gateway::slots::{InMemorySlotStore, NewSlot, SlotStore};
//!
//! let store = InMemorySlotStore::new();
//! let id = store.insert(&NewSlot::new("d1", 100, 200)).unwrap();
//!
//! let slots = store.find_by_dentist("d1").unwrap();
//! assert_eq!(slots[0].id, id);
//! assert_eq!(store.delete_by_id(&id).unwrap(), 1);
//! ```

mod in_memory;
#[cfg(feature = "mongo")]
mod mongo;
mod store;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use in_memory::InMemorySlotStore;
#[cfg(feature = "mongo")]
pub use mongo::{MongoSettings, MongoSlotStore};
pub use store::SlotStore;

/// A stored available time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTime {
    pub id: String,
    pub dentist_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl AvailableTime {
    /// The dedup triple identifying this slot.
    pub fn key(&self) -> SlotKey {
        SlotKey {
            dentist_id: self.dentist_id.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// A slot that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub dentist_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl NewSlot {
    pub fn new(dentist_id: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            dentist_id: dentist_id.into(),
            start_time,
            end_time,
        }
    }

    /// Whether the interval is ordered (`start_time <= end_time`).
    pub fn is_ordered(&self) -> bool {
        self.start_time <= self.end_time
    }

    pub fn key(&self) -> SlotKey {
        SlotKey {
            dentist_id: self.dentist_id.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Attach a store-assigned id.
    pub fn with_id(self, id: impl Into<String>) -> AvailableTime {
        AvailableTime {
            id: id.into(),
            dentist_id: self.dentist_id,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// `(dentist_id, start_time, end_time)`: no two stored slots may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub dentist_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.dentist_id, self.start_time, self.end_time)
    }
}

/// Error type for slot store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A slot with the same key is already stored.
    Duplicate(SlotKey),
    /// The id cannot address any document in this store.
    InvalidId(String),
    /// A stored document could not be decoded into an `AvailableTime`.
    Decode(String),
    /// Storage-level error (connection, query, write).
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate(key) => write!(f, "duplicate available time: {}", key),
            StoreError::InvalidId(id) => write!(f, "invalid available time id: {}", id),
            StoreError::Decode(msg) => write!(f, "available time decode error: {}", msg),
            StoreError::Storage(msg) => write!(f, "available time storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
