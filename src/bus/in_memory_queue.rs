//! In-memory queue for testing and single-process scenarios.
//!
//! This module provides a thread-safe in-memory queue that implements
//! both `Publisher` and `Subscriber` traits, useful for:
//! - Unit and integration testing without a broker
//! - Asserting exactly which responses a request produced

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use super::{Message, PublishError, Publisher, Subscriber};

/// In-memory queue for testing and single-process scenarios.
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`)
/// - Messages are stored in an append-only log
/// - Each subscriber tracks its own read position
/// - Subscribers can be restricted to a set of topics
///
/// ## Example
///
/// ```
/// use availability_gateway::bus::{InMemoryQueue, Message, Publisher, Subscriber};
///
/// let queue = InMemoryQueue::new();
/// let requests = queue.subscribe_to(&["grp20/dentist/post"]);
///
/// queue.publish(Message::with_string_payload("grp20/res/availabletime/create", "{}")).unwrap();
/// queue.publish(Message::with_string_payload("grp20/dentist/post", "{}")).unwrap();
///
/// let message = requests.poll(100).unwrap().unwrap();
/// assert_eq!(message.topic, "grp20/dentist/post");
/// assert!(requests.poll(10).unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    /// Shared message log
    log: Arc<RwLock<Vec<Message>>>,
    /// Per-subscriber read position
    position: Arc<Mutex<usize>>,
    /// Topics this handle yields when polled; `None` means every topic
    topics: Option<Arc<Vec<String>>>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    /// Create a new in-memory queue.
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(Mutex::new(0)),
            topics: None,
        }
    }

    /// Create a new subscriber that shares the same log but has its own position.
    pub fn new_subscriber(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            position: Arc::new(Mutex::new(0)),
            topics: None,
        }
    }

    /// Create a subscriber that only yields messages published on `topics`.
    pub fn subscribe_to<T: AsRef<str>>(&self, topics: &[T]) -> Self {
        Self {
            log: Arc::clone(&self.log),
            position: Arc::new(Mutex::new(0)),
            topics: Some(Arc::new(
                topics.iter().map(|t| t.as_ref().to_string()).collect(),
            )),
        }
    }

    fn read_log(&self) -> std::sync::RwLockReadGuard<'_, Vec<Message>> {
        self.log.read().unwrap_or_else(|e| e.into_inner())
    }

    fn accepts(&self, topic: &str) -> bool {
        match &self.topics {
            Some(topics) => topics.iter().any(|t| t == topic),
            None => true,
        }
    }

    /// Get all messages in the log.
    pub fn messages(&self) -> Vec<Message> {
        self.read_log().clone()
    }

    /// Get all topics in publish order.
    pub fn topics(&self) -> Vec<String> {
        self.read_log().iter().map(|m| m.topic.clone()).collect()
    }

    /// Get the total number of messages in the log.
    pub fn len(&self) -> usize {
        self.read_log().len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.read_log().is_empty()
    }

    /// Find the first message published on a topic.
    pub fn find_by_topic(&self, topic: &str) -> Option<Message> {
        self.read_log().iter().find(|m| m.topic == topic).cloned()
    }

    /// Find all messages published on a topic.
    pub fn find_all_by_topic(&self, topic: &str) -> Vec<Message> {
        self.read_log()
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    /// Find every message whose correlation id matches `request_id`.
    pub fn replies_to(&self, request_id: &str) -> Vec<Message> {
        self.read_log()
            .iter()
            .filter(|m| m.correlation_id() == Some(request_id))
            .cloned()
            .collect()
    }

    /// Get the current subscriber position.
    pub fn current_position(&self) -> usize {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clear all messages from the log (useful for test cleanup).
    pub fn clear(&self) {
        self.log.write().unwrap_or_else(|e| e.into_inner()).clear();
        *self.position.lock().unwrap_or_else(|e| e.into_inner()) = 0;
    }
}

impl Publisher for InMemoryQueue {
    fn publish(&self, message: Message) -> Result<(), PublishError> {
        self.log
            .write()
            .map_err(|_| PublishError::ConnectionFailed("lock poisoned".into()))?
            .push(message);
        Ok(())
    }

    fn publish_batch(&self, messages: Vec<Message>) -> Result<(), PublishError> {
        self.log
            .write()
            .map_err(|_| PublishError::ConnectionFailed("lock poisoned".into()))?
            .extend(messages);
        Ok(())
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Message>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self
                    .log
                    .read()
                    .map_err(|_| PublishError::ConnectionFailed("lock poisoned".into()))?;
                let mut pos = self
                    .position
                    .lock()
                    .map_err(|_| PublishError::ConnectionFailed("lock poisoned".into()))?;

                while *pos < log.len() {
                    let message = &log[*pos];
                    *pos += 1;
                    if self.accepts(&message.topic) {
                        return Ok(Some(message.clone()));
                    }
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
