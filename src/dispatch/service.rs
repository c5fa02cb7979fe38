//! Service: topic routing, payload decoding and reply publication.
//!
//! `Service<S>` holds a store, a publisher and a set of routes. Each route
//! binds a request topic to a handler and, for external routes, a reply
//! topic. Handlers never publish their own reply: [`Service::handle`]
//! publishes exactly one [`Response`] per request on every external route,
//! whether the handler succeeded or not, and none on internal routes.
//!
//! ## Example
//!
//! ```
//! use availability_gateway::bus::{InMemoryQueue, Message};
//! use availability_gateway::dispatch::{Response, Service};
//! use availability_gateway::slots::InMemorySlotStore;
//!
//! let queue = InMemoryQueue::new();
//! let service = Service::new(InMemorySlotStore::new(), queue.clone())
//!     .route("ping", Some("pong"), |_ctx| Ok(Response::ok("pong")));
//!
//! service.handle(&Message::with_string_payload("ping", "{}")).unwrap();
//! assert_eq!(queue.find_all_by_topic("pong").len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, info_span, warn};

use super::context::Context;
use super::error::HandlerError;
use super::response::Response;
use crate::bus::{Message, PublishError, Publisher, CORRELATION_ID};

type Guard<S> = Box<dyn Fn(&Context<S>) -> bool + Send + Sync>;
type Handler<S> = Box<dyn Fn(&Context<S>) -> Result<Response, HandlerError> + Send + Sync>;

/// What a create does when the existence check itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Reject the create with "unable to validate uniqueness".
    #[default]
    FailClosed,
    /// Log and proceed as if no duplicate exists.
    FailOpen,
}

impl std::str::FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-closed" | "closed" => Ok(DedupPolicy::FailClosed),
            "fail-open" | "open" => Ok(DedupPolicy::FailOpen),
            other => Err(format!(
                "unknown dedup policy {:?} (expected fail-closed or fail-open)",
                other
            )),
        }
    }
}

/// A registered route.
struct Route<S> {
    reply_topic: Option<String>,
    guard: Option<Guard<S>>,
    handle: Handler<S>,
}

/// Routes bus messages to handler functions.
///
/// Generic over `S`, the store type. Handlers receive a `Context<S>`
/// and reach the store via `ctx.store()`.
pub struct Service<S> {
    store: S,
    publisher: Arc<dyn Publisher>,
    routes: HashMap<String, Route<S>>,
    dedup: DedupPolicy,
}

impl<S: Send + Sync + 'static> Service<S> {
    /// Create a new service with the given store and publisher.
    pub fn new(store: S, publisher: impl Publisher + 'static) -> Self {
        Self {
            store,
            publisher: Arc::new(publisher),
            routes: HashMap::new(),
            dedup: DedupPolicy::default(),
        }
    }

    pub fn with_dedup_policy(mut self, policy: DedupPolicy) -> Self {
        self.dedup = policy;
        self
    }

    /// Register a handler for `topic`.
    ///
    /// With `reply_topic: None` the route is internal: nothing is ever
    /// published in reply and outcomes are only logged.
    pub fn route<F>(mut self, topic: &str, reply_topic: Option<&str>, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        self.routes.insert(
            topic.to_string(),
            Route {
                reply_topic: reply_topic.map(str::to_string),
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a handler with a guard function.
    ///
    /// The guard runs before the handler. If it returns `false`,
    /// the request is rejected with `HandlerError::GuardRejected`.
    pub fn route_guarded<G, F>(
        mut self,
        topic: &str,
        reply_topic: Option<&str>,
        guard: G,
        handler: F,
    ) -> Self
    where
        G: Fn(&Context<S>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<S>) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        self.routes.insert(
            topic.to_string(),
            Route {
                reply_topic: reply_topic.map(str::to_string),
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Decode and run the handler for a message without publishing a reply.
    pub fn dispatch(&self, message: &Message) -> Result<Response, HandlerError> {
        let route = self
            .routes
            .get(&message.topic)
            .ok_or_else(|| HandlerError::UnknownTopic(message.topic.clone()))?;

        let input: Value = serde_json::from_slice(&message.payload)?;
        let ctx = Context::new(message, input, &self.store, self.publisher.as_ref(), self.dedup);

        if let Some(guard) = &route.guard {
            if !guard(&ctx) {
                return Err(HandlerError::GuardRejected(message.topic.clone()));
            }
        }

        (route.handle)(&ctx)
    }

    /// Dispatch a message and publish its reply (external routes only).
    ///
    /// Returns the handler outcome, or `HandlerError::Publish` if the reply
    /// could not be published.
    pub fn handle(&self, message: &Message) -> Result<Response, HandlerError> {
        let span = info_span!("request", topic = %message.topic, message_id = %message.id);
        let _enter = span.enter();

        let result = self.dispatch(message);

        let reply_topic = match self.routes.get(&message.topic) {
            Some(route) => route.reply_topic.as_deref(),
            None => {
                warn!("no route for topic, message dropped");
                return result;
            }
        };

        let Some(reply_topic) = reply_topic else {
            match &result {
                Ok(_) => info!("internal request handled"),
                Err(e @ (HandlerError::DecodeFailed(_) | HandlerError::GuardRejected(_))) => {
                    warn!(error = %e, "malformed payload dropped")
                }
                Err(e) => warn!(error = %e, "internal request failed"),
            }
            return result;
        };

        let response = match &result {
            Ok(response) => response.clone(),
            Err(e) => Response::from_error(e),
        };

        match result.as_ref().err() {
            None => debug!(status = response.status, "request handled"),
            Some(e) if response.status >= 500 => {
                error!(status = response.status, error = %e, "request failed")
            }
            Some(e) => warn!(status = response.status, error = %e, "request rejected"),
        }

        if let Err(e) = self.reply(reply_topic, &message.id, &response) {
            error!(reply_topic, error = %e, "reply publish failed");
            return Err(HandlerError::Publish(e));
        }

        result
    }

    fn reply(&self, topic: &str, request_id: &str, response: &Response) -> Result<(), PublishError> {
        let message = Message::encode(topic, response)?.with_metadata(CORRELATION_ID, request_id);
        self.publisher.publish(message)
    }

    /// Request topics with a registered route.
    pub fn topics(&self) -> Vec<&str> {
        self.routes.keys().map(|s| s.as_str()).collect()
    }

    /// Reply topic of the route bound to `topic`, if it has one.
    pub fn reply_topic(&self, topic: &str) -> Option<&str> {
        self.routes.get(topic)?.reply_topic.as_deref()
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup
    }
}
