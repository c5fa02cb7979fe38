//! SlotStore - the store gateway for available times.

use super::{AvailableTime, NewSlot, SlotKey, StoreError};

/// Storage for the available times collection.
///
/// Implementations translate each call to one store round-trip and carry no
/// business rules, with one exception: `insert` must refuse a slot whose
/// [`SlotKey`] is already stored, atomically with the write.
pub trait SlotStore: Send + Sync {
    /// Insert a new slot and return its store-assigned id.
    ///
    /// Fails with `StoreError::Duplicate` if the key is taken.
    fn insert(&self, slot: &NewSlot) -> Result<String, StoreError>;

    /// All slots owned by `dentist_id`, in store iteration order.
    ///
    /// Any undecodable document fails the whole call.
    fn find_by_dentist(&self, dentist_id: &str) -> Result<Vec<AvailableTime>, StoreError>;

    /// Number of stored slots matching `key`.
    fn count_matching(&self, key: &SlotKey) -> Result<u64, StoreError>;

    /// Delete the slot with `id`. Returns the number of documents removed (0 or 1).
    fn delete_by_id(&self, id: &str) -> Result<u64, StoreError>;

    /// Whether a slot with `key` is stored.
    fn exists(&self, key: &SlotKey) -> Result<bool, StoreError> {
        Ok(self.count_matching(key)? > 0)
    }
}

impl<S: SlotStore + ?Sized> SlotStore for std::sync::Arc<S> {
    fn insert(&self, slot: &NewSlot) -> Result<String, StoreError> {
        (**self).insert(slot)
    }

    fn find_by_dentist(&self, dentist_id: &str) -> Result<Vec<AvailableTime>, StoreError> {
        (**self).find_by_dentist(dentist_id)
    }

    fn count_matching(&self, key: &SlotKey) -> Result<u64, StoreError> {
        (**self).count_matching(key)
    }

    fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        (**self).delete_by_id(id)
    }
}
