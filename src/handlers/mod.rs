//! Handlers for the available time topics.
//!
//! | Request topic | Handler | Reply topic |
//! |---|---|---|
//! | `grp20/dentist/post` | [`create`] | `grp20/res/availabletime/create` |
//! | `grp20/req/timeSlots/get` | [`list`] | `grp20/res/timeslots/get` |
//! | `grp20/req/dentist/delete` | [`delete`] | `grp20/res/dentist/delete` |
//! | `appointmentservice/internal/migrate` | [`migrate`] | none |

pub mod create;
pub mod delete;
pub mod list;
pub mod migrate;

use crate::bus::Publisher;
use crate::dispatch::Service;
use crate::slots::SlotStore;

/// Every request topic the gateway subscribes to.
pub const SUBSCRIBED_TOPICS: [&str; 4] = [create::TOPIC, list::TOPIC, delete::TOPIC, migrate::TOPIC];

/// The gateway service: all four routes over `store`, replying through `publisher`.
pub fn gateway<S: SlotStore + 'static>(store: S, publisher: impl Publisher + 'static) -> Service<S> {
    crate::register_routes!(Service::new(store, publisher), create, list, delete, migrate)
}
