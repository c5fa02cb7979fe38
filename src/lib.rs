//! Message-driven CRUD gateway for dentist available times.
//!
//! Requests arrive on bus topics, are validated and executed against the
//! available times collection, and are answered on a reply topic:
//!
//! ```text
//! bus ─► dispatch::subscribe ─► worker thread ─► Service::handle
//!                                                  │  decode + guard
//!                                                  ▼
//!                                          handlers::{create,list,delete,migrate}
//!                                                  │
//!                                                  ▼
//!                                          slots::SlotStore
//!                                                  │
//! bus ◄──────────── reply (external routes only) ◄─┘
//! ```
//!
//! ```
//! use availability_gateway::bus::{InMemoryQueue, Message};
//! use availability_gateway::dispatch::Response;
//! use availability_gateway::handlers::{self, create};
//! use availability_gateway::slots::InMemorySlotStore;
//!
//! let queue = InMemoryQueue::new();
//! let service = handlers::gateway(InMemorySlotStore::new(), queue.clone());
//!
//! service
//!     .handle(&Message::with_string_payload(
//!         create::TOPIC,
//!         r#"{"dentist_id":"d1","start_time":100,"end_time":200}"#,
//!     ))
//!     .unwrap();
//!
//! let reply: Response = queue
//!     .find_by_topic(create::REPLY_TOPIC.unwrap())
//!     .unwrap()
//!     .decode()
//!     .unwrap();
//! assert_eq!(reply.status, 201);
//! ```

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod slots;
pub mod telemetry;

pub use config::Config;
pub use dispatch::{DedupPolicy, HandlerError, Response, Service};
pub use slots::{AvailableTime, NewSlot, SlotKey, SlotStore, StoreError};
