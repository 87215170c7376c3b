use std::error::Error;
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Per-trip failure classification, as recorded in the failure ledger.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureKind {
    /// Fewer than 2 points after normalization; matching is undefined.
    InsufficientPoints,
    /// The service left at least one input point unresolved.
    UnresolvedTracepoint,
    /// Network-level failure, timeout, or a non-2xx status.
    TransportError,
    /// Malformed or unexpected response payload.
    ApplicationError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InsufficientPoints => "InsufficientPoints",
            FailureKind::UnresolvedTracepoint => "UnresolvedTracepoint",
            FailureKind::TransportError => "TransportError",
            FailureKind::ApplicationError => "ApplicationError",
        }
    }
}

/// Everything that can go wrong matching one trip.
#[derive(Debug)]
pub enum MatchError {
    /// Sequence too short to match; carries the point count.
    InsufficientPoints(usize),
    /// Connection-level failure (refused, timed out, DNS).
    Http(reqwest::Error),
    /// Non-2xx status with the raw body text attached.
    Status(StatusCode, String),
    /// Body could not be deserialized.
    Json(reqwest::Error),
    /// Response deserialized but violated the service contract.
    Api(String),
    /// Tracepoint at this index came back null.
    UnresolvedTracepoint(usize),
}

impl MatchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MatchError::InsufficientPoints(_) => FailureKind::InsufficientPoints,
            MatchError::Http(_) | MatchError::Status(_, _) => FailureKind::TransportError,
            MatchError::Json(_) | MatchError::Api(_) => FailureKind::ApplicationError,
            MatchError::UnresolvedTracepoint(_) => FailureKind::UnresolvedTracepoint,
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::InsufficientPoints(count) => {
                write!(f, "{} point(s) is too few for map matching", count)
            }
            MatchError::Http(err) => write!(f, "request failed: {}", err),
            MatchError::Status(status, body) => {
                write!(f, "HTTP {}: {}", status, body.trim())
            }
            MatchError::Json(err) => write!(f, "malformed response body: {}", err),
            MatchError::Api(message) => write!(f, "unexpected response: {}", message),
            MatchError::UnresolvedTracepoint(index) => {
                write!(f, "tracepoint {} is unresolved", index)
            }
        }
    }
}

impl Error for MatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MatchError::Http(err) | MatchError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MatchError {
    fn from(err: reqwest::Error) -> Self {
        MatchError::Http(err)
    }
}
