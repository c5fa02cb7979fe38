//! Error types for request handlers.

use std::error::Error;
use std::fmt;

use crate::bus::PublishError;
use crate::slots::StoreError;

/// Error type for handler operations.
#[derive(Debug)]
pub enum HandlerError {
    /// No route registered for this topic.
    UnknownTopic(String),
    /// Payload decode / deserialization failed.
    DecodeFailed(String),
    /// Guard rejected the payload (required fields missing).
    GuardRejected(String),
    /// Domain rule rejected the request (duplicate slot, invalid range).
    Conflict(String),
    /// The addressed slot does not exist.
    NotFound(String),
    /// The uniqueness check itself failed, so the write was not attempted.
    Unverified(StoreError),
    /// Store error.
    Store(StoreError),
    /// Publishing to the bus failed.
    Publish(PublishError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::UnknownTopic(topic) => write!(f, "unknown topic: {}", topic),
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::GuardRejected(topic) => write!(f, "guard rejected payload on {}", topic),
            HandlerError::Conflict(msg) => write!(f, "conflict: {}", msg),
            HandlerError::NotFound(id) => write!(f, "not found: {}", id),
            HandlerError::Unverified(e) => write!(f, "unable to validate uniqueness: {}", e),
            HandlerError::Store(e) => write!(f, "store error: {}", e),
            HandlerError::Publish(e) => write!(f, "publish error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Unverified(e) | HandlerError::Store(e) => Some(e),
            HandlerError::Publish(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(key) => {
                HandlerError::Conflict(format!("duplicate available time {}", key))
            }
            StoreError::InvalidId(id) => HandlerError::DecodeFailed(format!("invalid id {}", id)),
            other => HandlerError::Store(other),
        }
    }
}

impl From<PublishError> for HandlerError {
    fn from(err: PublishError) -> Self {
        HandlerError::Publish(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownTopic(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Conflict(_) => 409,
            HandlerError::NotFound(_) => 404,
            HandlerError::Unverified(_) => 500,
            HandlerError::Store(_) => 500,
            HandlerError::Publish(_) => 500,
        }
    }

    /// The text published to the requester. Store and bus details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            HandlerError::UnknownTopic(_) => "Unknown topic".to_string(),
            HandlerError::DecodeFailed(_) | HandlerError::GuardRejected(_) => {
                "Bad request".to_string()
            }
            HandlerError::Conflict(msg) => msg.clone(),
            HandlerError::NotFound(_) => "Available time not found".to_string(),
            HandlerError::Unverified(_) => "Unable to validate uniqueness".to_string(),
            HandlerError::Store(StoreError::Decode(_)) => {
                "An error occurred while decoding results".to_string()
            }
            HandlerError::Store(_) | HandlerError::Publish(_) => "An error occurred".to_string(),
        }
    }
}
