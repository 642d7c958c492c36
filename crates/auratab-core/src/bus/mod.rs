//! Cross-context message bus
//!
//! A typed, host-agnostic request/response and broadcast layer between
//! the background context and every open tab or popup context. The wire
//! unit is a JSON value with a `type` discriminant; delivery failures and
//! timeouts collapse to "no response" so callers always get a stable
//! shape back.

mod router;

pub use router::{BusHandle, Envelope, EndpointKind, MessageRouter};
