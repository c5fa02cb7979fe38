//! Publisher trait and the bus error type.

use std::error::Error;
use std::fmt;

use super::Message;

/// Error type for bus operations.
#[derive(Debug)]
pub enum PublishError {
    /// Connection to the bus failed
    ConnectionFailed(String),
    /// Serialization of the message failed
    SerializationFailed(String),
    /// The bus rejected the message
    Rejected(String),
    /// The bus is gone and will not deliver anything else
    Closed,
    /// Other error
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            PublishError::SerializationFailed(msg) => write!(f, "Serialization failed: {}", msg),
            PublishError::Rejected(msg) => write!(f, "Message rejected: {}", msg),
            PublishError::Closed => write!(f, "Bus closed"),
            PublishError::Other(e) => write!(f, "Publish error: {}", e),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::SerializationFailed(err.to_string())
    }
}

/// Trait for publishing messages to a bus.
pub trait Publisher: Send + Sync {
    /// Publish a single message on its topic.
    fn publish(&self, message: Message) -> Result<(), PublishError>;

    /// Publish multiple messages.
    ///
    /// Default implementation publishes sequentially and stops at the first error.
    fn publish_batch(&self, messages: Vec<Message>) -> Result<(), PublishError> {
        for message in messages {
            self.publish(message)?;
        }
        Ok(())
    }
}

impl<P: Publisher + ?Sized> Publisher for std::sync::Arc<P> {
    fn publish(&self, message: Message) -> Result<(), PublishError> {
        (**self).publish(message)
    }

    fn publish_batch(&self, messages: Vec<Message>) -> Result<(), PublishError> {
        (**self).publish_batch(messages)
    }
}
