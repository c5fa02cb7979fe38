//! Handler: create an available time.
//!
//! Order of checks: existence, then range, then insert. The insert also
//! refuses a duplicate key, which covers two creates racing past the
//! existence check.

use serde::Deserialize;
use tracing::{info, warn};

use crate::dispatch::{Context, DedupPolicy, HandlerError, Response};
use crate::slots::{NewSlot, SlotKey, SlotStore, StoreError};

pub const TOPIC: &str = "grp20/dentist/post";
pub const REPLY_TOPIC: Option<&str> = Some("grp20/res/availabletime/create");

pub const ALREADY_EXISTS: &str = "An identical available time already exists";
pub const INVALID_RANGE: &str = "End time must be after the start time";
pub const CREATED: &str = "Available time created";

#[derive(Debug, Clone, Deserialize)]
pub struct Input {
    pub dentist_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl From<Input> for NewSlot {
    fn from(input: Input) -> Self {
        NewSlot::new(input.dentist_id, input.start_time, input.end_time)
    }
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["dentist_id", "start_time", "end_time"])
}

pub fn handle<S: SlotStore>(ctx: &Context<S>) -> Result<Response, HandlerError> {
    let slot: NewSlot = ctx.input::<Input>()?.into();
    create_slot(ctx, &slot)?;
    Ok(Response::created(CREATED))
}

/// Validate and insert `slot`, returning its new id. Shared with the migrate route.
pub(crate) fn create_slot<S: SlotStore>(
    ctx: &Context<S>,
    slot: &NewSlot,
) -> Result<String, HandlerError> {
    if slot_exists(ctx, &slot.key())? {
        return Err(HandlerError::Conflict(ALREADY_EXISTS.to_string()));
    }

    if !slot.is_ordered() {
        return Err(HandlerError::Conflict(INVALID_RANGE.to_string()));
    }

    let id = ctx.store().insert(slot).map_err(|e| match e {
        StoreError::Duplicate(_) => HandlerError::Conflict(ALREADY_EXISTS.to_string()),
        other => HandlerError::Store(other),
    })?;

    info!(slot_id = %id, dentist_id = %slot.dentist_id, "registered available time");
    Ok(id)
}

fn slot_exists<S: SlotStore>(ctx: &Context<S>, key: &SlotKey) -> Result<bool, HandlerError> {
    match ctx.store().exists(key) {
        Ok(found) => Ok(found),
        Err(e) => match ctx.dedup_policy() {
            DedupPolicy::FailClosed => Err(HandlerError::Unverified(e)),
            DedupPolicy::FailOpen => {
                warn!(error = %e, slot = %key, "existence check failed, assuming no duplicate");
                Ok(false)
            }
        },
    }
}
