//! Interaction with the external map-matching service.
//!
//! The request builder and response parser are pure; the only I/O boundary
//! is [`ValhallaClient`]. Every outcome of a call becomes a typed result;
//! no transport fault escapes past this module.

pub mod client;
pub mod error;
mod parser;
pub mod request;
pub mod response;

pub use client::{MatchService, ValhallaClient};
pub use error::{FailureKind, MatchError};
pub use request::{build_trace_request, TraceRequest};
pub use response::TraceMatch;
