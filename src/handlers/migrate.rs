//! Handler: internal migration import.
//!
//! Runs the same checks and insert as [`create`](super::create) on an
//! internal topic with no reply topic: outcomes are only visible in the
//! store and the logs. Malformed payloads are dropped by the dispatcher.

use crate::dispatch::{Context, HandlerError, Response};
use crate::slots::{NewSlot, SlotStore};

use super::create;

pub const TOPIC: &str = "appointmentservice/internal/migrate";
pub const REPLY_TOPIC: Option<&str> = None;

pub fn guard<S>(ctx: &Context<S>) -> bool {
    create::guard(ctx)
}

pub fn handle<S: SlotStore>(ctx: &Context<S>) -> Result<Response, HandlerError> {
    let slot: NewSlot = ctx.input::<create::Input>()?.into();
    create::create_slot(ctx, &slot)?;
    Ok(Response::created("Available time migrated"))
}
