//! Handler: list a dentist's available times.

use serde::Deserialize;

use crate::dispatch::{Context, HandlerError, Response};
use crate::slots::SlotStore;

pub const TOPIC: &str = "grp20/req/timeSlots/get";
pub const REPLY_TOPIC: Option<&str> = Some("grp20/res/timeslots/get");

pub const RETRIEVED: &str = "Available times retrieved";

#[derive(Debug, Clone, Deserialize)]
pub struct Input {
    pub dentist_id: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["dentist_id"])
}

/// No match is a 200 with an empty list. One undecodable record fails the
/// whole request; partial lists are never returned.
pub fn handle<S: SlotStore>(ctx: &Context<S>) -> Result<Response, HandlerError> {
    let input = ctx.input::<Input>()?;
    let slots = ctx.store().find_by_dentist(&input.dentist_id)?;
    Ok(Response::ok(RETRIEVED).with_available_times(slots))
}
