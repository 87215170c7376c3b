use geo::Point;

use super::error::MatchError;
use super::response::{TraceMatch, TraceRouteResponse};

/// Precision the service encodes its geometry with. A mismatch here would
/// scale every coordinate by a factor of ten, so it is fixed in one place.
pub(super) const POLYLINE_PRECISION: u32 = 6;

/// Translate a deserialized 2xx response into a [`TraceMatch`], rejecting
/// partial results: any null tracepoint or a tracepoint count differing
/// from the input length fails the whole trip.
pub(super) fn parse_trace_response(
    response: TraceRouteResponse,
    input_len: usize,
) -> Result<TraceMatch, MatchError> {
    let matchings = response
        .matchings
        .ok_or_else(|| MatchError::Api("response has no matchings".to_string()))?;
    let matching = matchings
        .into_iter()
        .next()
        .ok_or_else(|| MatchError::Api("matchings array is empty".to_string()))?;
    let encoded = matching
        .geometry
        .ok_or_else(|| MatchError::Api("matching has no geometry".to_string()))?;

    let tracepoints = response
        .tracepoints
        .ok_or_else(|| MatchError::Api("response has no tracepoints".to_string()))?;
    if tracepoints.len() != input_len {
        return Err(MatchError::Api(format!(
            "{} tracepoints returned for {} input points",
            tracepoints.len(),
            input_len
        )));
    }

    let mut snapped = Vec::with_capacity(tracepoints.len());
    for (index, tracepoint) in tracepoints.into_iter().enumerate() {
        let tracepoint = tracepoint.ok_or(MatchError::UnresolvedTracepoint(index))?;
        // Wire order is [lat, lon]; internal order is x=lon, y=lat.
        snapped.push(Point::new(tracepoint.location[1], tracepoint.location[0]));
    }

    let geometry = polyline::decode_polyline(&encoded, POLYLINE_PRECISION)
        .map_err(|err| MatchError::Api(format!("failed to decode geometry: {}", err)))?;

    Ok(TraceMatch { snapped, geometry })
}
