//! Core records for raw vehicle positions and per-trip traces.
//!
//! Coordinates are WGS84 degrees throughout. The canonical internal axis
//! order for geometry types is the georust convention (`x` = longitude,
//! `y` = latitude); named `lat`/`lon` fields are used everywhere else, and
//! conversion to interchange order happens only at export boundaries.

use geo::Point;
use serde::{Deserialize, Serialize};

/// A single raw GPS ping as emitted by a vehicle feed. Immutable once read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    pub vehicle_id: String,
    pub trip_id: String,
    pub route_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Epoch seconds.
    pub timestamp: i64,
    /// Compass heading in degrees, when the feed reports one.
    pub bearing: Option<u16>,
}

/// Identity of one physical trip execution. Pings sharing a key are assumed
/// to belong to one continuous vehicle run.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TripKey {
    pub vehicle_id: String,
    pub trip_id: String,
    pub route_id: Option<String>,
}

impl TripKey {
    pub fn new(
        vehicle_id: impl Into<String>,
        trip_id: impl Into<String>,
        route_id: Option<String>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            trip_id: trip_id.into(),
            route_id,
        }
    }
}

/// A raw position stripped to what the matching service consumes.
///
/// Serializes directly as one entry of the request `shape` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub lat: f64,
    pub lon: f64,
    /// Original feed timestamp, epoch seconds. The matching service never
    /// owns timestamp semantics; this value survives snapping bit-exact.
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,
}

impl TracePoint {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<&RawPosition> for TracePoint {
    fn from(position: &RawPosition) -> Self {
        Self {
            lat: position.latitude,
            lon: position.longitude,
            time: position.timestamp,
            heading: position.bearing,
        }
    }
}
