use serde::Serialize;

use super::error::MatchError;
use crate::params::MatchOptions;
use crate::position::TracePoint;

/// Payload for the service's `trace_route` endpoint. Points are sent in
/// input order; `use_timestamps` makes the matcher honor that ordering.
#[derive(Clone, Debug, Serialize)]
pub struct TraceRequest {
    pub shape: Vec<TracePoint>,
    pub costing: String,
    pub shape_match: &'static str,
    pub use_timestamps: bool,
    pub trace_options: TraceRequestOptions,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TraceRequestOptions {
    pub search_radius: u32,
    pub turn_penalty_factor: u32,
}

/// Build the matching payload for one trip, rejecting sequences with fewer
/// than 2 points before any network activity.
pub fn build_trace_request(
    points: &[TracePoint],
    options: &MatchOptions,
) -> Result<TraceRequest, MatchError> {
    if points.len() < 2 {
        return Err(MatchError::InsufficientPoints(points.len()));
    }

    Ok(TraceRequest {
        shape: points.to_vec(),
        costing: options.costing.clone(),
        shape_match: "map_snap",
        use_timestamps: true,
        trace_options: TraceRequestOptions {
            search_radius: options.search_radius,
            turn_penalty_factor: options.turn_penalty_factor,
        },
    })
}
