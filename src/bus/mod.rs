//! Bus - topic-based publish/subscribe abstractions.
//!
//! The gateway only ever talks to the bus through the two traits in this
//! module, so the dispatcher and handlers run unchanged over MQTT in
//! production and over [`InMemoryQueue`] in tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Publisher + Subscriber Traits                   │
//! │  Publisher: publish(message) / publish_batch(messages)      │
//! │  Subscriber: poll(timeout)                                  │
//! └─────────────────────────────────────────────────────────────┘
//!              │                              │
//!              ▼                              ▼
//! ┌─────────────────────────┐    ┌─────────────────────────────┐
//! │      InMemoryQueue      │    │  MqttBus (feature "mqtt")   │
//! │  (tests, single process)│    │  QoS 0, at-most-once        │
//! └─────────────────────────┘    └─────────────────────────────┘
//! ```
//!
//! Delivery is at-most-once: there is no acknowledgment protocol, a message
//! that was polled is considered consumed.

mod in_memory_queue;
mod message;
#[cfg(feature = "mqtt")]
mod mqtt;
mod publisher;
mod subscriber;

pub use in_memory_queue::InMemoryQueue;
pub use message::{Message, CORRELATION_ID};
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttBus, MqttSettings};
pub use publisher::{PublishError, Publisher};
pub use subscriber::Subscriber;
