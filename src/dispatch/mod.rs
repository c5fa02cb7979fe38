//! dispatch: topic-routed request handling over the bus.
//!
//! A [`Service`] binds request topics to handlers. Each handler receives a
//! [`Context<S>`] with the decoded payload and the store, and returns a
//! [`Response`] or a [`HandlerError`]. The service turns either outcome into
//! exactly one reply on the route's reply topic; internal routes never reply.
//!
//! ## Handler Convention
//!
//! Each handler module follows this convention:
//!
//! ```ignore
//! // src/handlers/list.rs
//!
//! pub const TOPIC: &str = "grp20/req/timeSlots/get";
//! pub const REPLY_TOPIC: Option<&str> = Some("grp20/res/timeslots/get");
//!
//! pub fn guard<S>(ctx: &Context<S>) -> bool {
//!     ctx.has_fields(&["dentist_id"])
//! }
//!
//! pub fn handle<S: SlotStore>(ctx: &Context<S>) -> Result<Response, HandlerError> {
//!     let input = ctx.input::<Input>()?;
//!     let slots = ctx.store().find_by_dentist(&input.dentist_id)?;
//!     Ok(Response::ok("Available times retrieved").with_available_times(slots))
//! }
//! ```

mod context;
mod error;
mod response;
mod service;
mod transport;

pub use context::Context;
pub use error::HandlerError;
pub use response::Response;
pub use service::{DedupPolicy, Service};
pub use transport::{subscribe, TransportHandle, TransportStats};

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `TOPIC: &str`: the request topic
/// - `REPLY_TOPIC: Option<&str>`: where the reply goes, `None` for internal routes
/// - `guard(ctx) -> bool`: required-field check
/// - `handle(ctx) -> Result<Response, HandlerError>`: the handler
///
/// # Example
/// ```ignore
/// let service = availability_gateway::register_routes!(
///     Service::new(store, publisher),
///     handlers::create,
///     handlers::list,
/// );
/// ```
#[macro_export]
macro_rules! register_routes {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .route_guarded(
                $($seg)::+::TOPIC,
                $($seg)::+::REPLY_TOPIC,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
