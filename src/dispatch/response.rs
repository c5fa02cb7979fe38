//! Response envelope published on reply topics.

use serde::{Deserialize, Serialize};

use super::error::HandlerError;
use crate::slots::AvailableTime;

/// `{message, status, available_times?}` published once per external request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    /// HTTP-style status code.
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_times: Option<Vec<AvailableTime>>,
}

impl Response {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            available_times: None,
        }
    }

    /// 200
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(200, message)
    }

    /// 201
    pub fn created(message: impl Into<String>) -> Self {
        Self::new(201, message)
    }

    pub fn with_available_times(mut self, slots: Vec<AvailableTime>) -> Self {
        self.available_times = Some(slots);
        self
    }

    pub fn from_error(err: &HandlerError) -> Self {
        Self::new(err.status_code(), err.public_message())
    }
}
