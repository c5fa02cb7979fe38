//! Context passed to request handlers.
//!
//! Carries the parsed payload, the id of the request message, the
//! store, and the bus publisher for side messages.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::service::DedupPolicy;
use crate::bus::{Message, PublishError, Publisher};

/// The context passed to every handler.
///
/// Generic over `S` (the store type) so handlers run against whatever
/// store the service is configured with.
pub struct Context<'a, S> {
    message_id: &'a str,
    /// Payload parsed as JSON.
    input: Value,
    store: &'a S,
    publisher: &'a dyn Publisher,
    dedup: DedupPolicy,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(
        message: &'a Message,
        input: Value,
        store: &'a S,
        publisher: &'a dyn Publisher,
        dedup: DedupPolicy,
    ) -> Self {
        Self {
            message_id: &message.id,
            input,
            store,
            publisher,
            dedup,
        }
    }

    /// Deserialize the payload into a typed request.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    /// Id of the request message.
    pub fn message_id(&self) -> &str {
        self.message_id
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        self.store
    }

    /// How a failed existence check is treated.
    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup
    }

    /// Publish a side message (not the reply; the service sends that).
    pub fn publish(&self, message: Message) -> Result<(), PublishError> {
        self.publisher.publish(message)
    }

    /// Check if the payload contains a non-null field.
    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some_and(|v| !v.is_null())
    }

    /// Check if the payload contains all specified fields.
    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
