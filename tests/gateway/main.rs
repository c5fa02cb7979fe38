//! Gateway integration tests: every route over an in-memory bus and store.

mod create;
mod delete;
mod list;
mod malformed;
mod migrate;
mod transport;
