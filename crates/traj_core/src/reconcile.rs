//! Result reconciler: merges snapped coordinates back into per-trip records,
//! preserving the original input timestamps. Pure transform, no side effects.

use geo_types::{Coord, LineString};
use serde::Serialize;

use crate::matching::TraceMatch;
use crate::position::{TracePoint, TripKey};

/// A trace point after snapping. `time` is the original feed timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchedPoint {
    pub lat: f64,
    pub lon: f64,
    pub time: i64,
}

/// One trip's geometry rebuilt from its snapped points.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedTrajectory {
    pub key: TripKey,
    pub geometry: LineString<f64>,
}

/// The service's own reference geometry for a matched trip, independent of
/// the input point density.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedShape {
    pub key: TripKey,
    pub geometry: LineString<f64>,
}

/// Everything produced for one successfully matched trip.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedTrip {
    pub key: TripKey,
    pub points: Vec<MatchedPoint>,
    pub trajectory: MatchedTrajectory,
    pub shape: MatchedShape,
}

/// Zip snapped coordinates with the original trace 1:1.
///
/// The parser already rejects responses whose tracepoint count differs from
/// the input length, so a mismatch here is a programming defect and panics.
pub fn reconcile(key: TripKey, trace: &[TracePoint], matched: TraceMatch) -> MatchedTrip {
    assert_eq!(
        matched.snapped.len(),
        trace.len(),
        "snapped point count must equal input trace length"
    );

    let points: Vec<MatchedPoint> = matched
        .snapped
        .iter()
        .zip(trace)
        .map(|(snapped, original)| MatchedPoint {
            lat: snapped.y(),
            lon: snapped.x(),
            time: original.time,
        })
        .collect();

    let geometry: LineString<f64> = points
        .iter()
        .map(|point| Coord {
            x: point.lon,
            y: point.lat,
        })
        .collect();

    MatchedTrip {
        trajectory: MatchedTrajectory {
            key: key.clone(),
            geometry,
        },
        shape: MatchedShape {
            key: key.clone(),
            geometry: matched.geometry,
        },
        key,
        points,
    }
}
