//! Subscriber trait for the bus.

use super::{Message, PublishError};

/// Trait for receiving messages from the bus.
///
/// This is a pull-based interface. Which topics a subscriber sees is decided
/// when it is created (MQTT subscriptions, `InMemoryQueue::subscribe_to`).
pub trait Subscriber: Send + Sync {
    /// Poll for the next message, blocking until one is available or timeout.
    ///
    /// Returns `Err(PublishError::Closed)` once no further message can arrive.
    fn poll(&self, timeout_ms: u64) -> Result<Option<Message>, PublishError>;
}
