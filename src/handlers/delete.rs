//! Handler: delete an available time by id.
//!
//! When nothing was deleted a [`DeleteNotice`] is published on
//! [`NOTICE_TOPIC`] for whichever service tracks slots, and the requester
//! gets a 404. The notice is fire-and-forget: no reply is expected and a
//! failed publish only logs.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bus::{Message, CORRELATION_ID};
use crate::dispatch::{Context, HandlerError, Response};
use crate::slots::SlotStore;

pub const TOPIC: &str = "grp20/req/dentist/delete";
pub const REPLY_TOPIC: Option<&str> = Some("grp20/res/dentist/delete");
pub const NOTICE_TOPIC: &str = "appointmentservice/internal/delete";

pub const DELETED: &str = "Available time deleted";

#[derive(Debug, Clone, Deserialize)]
pub struct Input {
    pub id: String,
}

/// Body of the compensating message for a missing delete target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteNotice {
    pub id: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle<S: SlotStore>(ctx: &Context<S>) -> Result<Response, HandlerError> {
    let input = ctx.input::<Input>()?;

    if ctx.store().delete_by_id(&input.id)? == 0 {
        notify_missing(ctx, &input.id);
        return Err(HandlerError::NotFound(input.id));
    }

    info!(slot_id = %input.id, "deleted available time");
    Ok(Response::ok(DELETED))
}

fn notify_missing<S>(ctx: &Context<S>, id: &str) {
    let notice = DeleteNotice { id: id.to_string() };
    let published = Message::encode(NOTICE_TOPIC, &notice)
        .map_err(Into::into)
        .and_then(|m| ctx.publish(m.with_metadata(CORRELATION_ID, ctx.message_id())));

    if let Err(e) = published {
        warn!(slot_id = %id, error = %e, "delete notice not published");
    }
}
