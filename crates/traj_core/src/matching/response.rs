use geo::Point;
use geo_types::LineString;
use serde::Deserialize;

/// A successful match for one trip, expressed in internal axis order
/// (`x` = longitude, `y` = latitude).
#[derive(Clone, Debug, PartialEq)]
pub struct TraceMatch {
    /// One snapped coordinate per input point, in input order.
    pub snapped: Vec<Point<f64>>,
    /// The service's own route geometry, decoded from its encoded polyline.
    pub geometry: LineString<f64>,
}

#[derive(Deserialize)]
pub(super) struct TraceRouteResponse {
    pub(super) matchings: Option<Vec<Matching>>,
    pub(super) tracepoints: Option<Vec<Option<Tracepoint>>>,
}

#[derive(Deserialize)]
pub(super) struct Matching {
    pub(super) geometry: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct Tracepoint {
    /// Service contract: `[lat, lon]`.
    pub(super) location: [f64; 2],
}
