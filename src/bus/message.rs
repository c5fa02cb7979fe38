//! Bus message: a topic plus a JSON payload.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Metadata key carrying the id of the request a response answers.
pub const CORRELATION_ID: &str = "correlation-id";

/// A message travelling over the bus.
#[derive(Clone, Debug)]
pub struct Message {
    /// Unique identifier for this message
    pub id: String,
    /// Topic the message is published on (e.g., "grp20/dentist/post")
    pub topic: String,
    /// Serialized payload (structured JSON text)
    pub payload: Vec<u8>,
    /// Optional metadata (correlation IDs, etc.). Not carried over MQTT 3.1.1.
    pub metadata: Option<Vec<(String, String)>>,
}

impl Message {
    /// Create a new message with a fresh id.
    pub fn new(topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string(), topic, payload)
    }

    /// Create a message with an explicit id.
    pub fn with_id(id: impl Into<String>, topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            payload,
            metadata: None,
        }
    }

    /// Create a message with a JSON-serialized payload.
    pub fn encode<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(payload)?;
        Ok(Self::new(topic, bytes))
    }

    /// Decode the payload from JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    /// Create a message with a string payload.
    pub fn with_string_payload(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(topic, payload.into().into_bytes())
    }

    /// Add metadata to the message.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Look up a metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The id of the request this message answers, if any.
    pub fn correlation_id(&self) -> Option<&str> {
        self.metadata_value(CORRELATION_ID)
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
