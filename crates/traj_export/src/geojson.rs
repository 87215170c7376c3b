//! GeoJSON writers for the trajectory, shape, and failure datasets.
//!
//! Every writer produces a valid FeatureCollection even when the input is
//! empty; a missing dataset would be indistinguishable from a failed run.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geo_types::LineString;
use serde_json::{json, Value};
use traj_core::ledger::FailureLedger;
use traj_core::position::TripKey;
use traj_core::reconcile::{MatchedShape, MatchedTrajectory};

fn key_properties(key: &TripKey) -> Value {
    json!({
        "vehicle_id": key.vehicle_id,
        "trip_id": key.trip_id,
        "route_id": key.route_id,
    })
}

/// Internal order is x=lon, y=lat, so interchange positions are `[x, y]`.
fn line_coordinates(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.0.iter().map(|coord| [coord.x, coord.y]).collect()
}

fn line_feature(key: &TripKey, line: &LineString<f64>) -> Value {
    json!({
        "type": "Feature",
        "properties": key_properties(key),
        "geometry": {
            "type": "LineString",
            "coordinates": line_coordinates(line),
        },
    })
}

fn write_collection<P: AsRef<Path>>(path: P, features: Vec<Value>) -> Result<(), Box<dyn Error>> {
    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &collection)?;
    Ok(())
}

/// One LineString feature per matched trip, rebuilt from its snapped points.
pub fn write_trajectories_geojson<P: AsRef<Path>>(
    path: P,
    trajectories: &[MatchedTrajectory],
) -> Result<(), Box<dyn Error>> {
    let features = trajectories
        .iter()
        .map(|trajectory| line_feature(&trajectory.key, &trajectory.geometry))
        .collect();
    write_collection(path, features)
}

/// One LineString feature per matched trip, using the service's own geometry.
pub fn write_shapes_geojson<P: AsRef<Path>>(
    path: P,
    shapes: &[MatchedShape],
) -> Result<(), Box<dyn Error>> {
    let features = shapes
        .iter()
        .map(|shape| line_feature(&shape.key, &shape.geometry))
        .collect();
    write_collection(path, features)
}

/// One Point feature per offending trace point of every failed trip, with
/// the failure classification attached.
pub fn write_failures_geojson<P: AsRef<Path>>(
    path: P,
    ledger: &FailureLedger,
) -> Result<(), Box<dyn Error>> {
    let features = ledger
        .export_points()
        .into_iter()
        .map(|row| {
            json!({
                "type": "Feature",
                "properties": {
                    "vehicle_id": row.key.vehicle_id,
                    "trip_id": row.key.trip_id,
                    "route_id": row.key.route_id,
                    "error_code": row.kind.as_str(),
                    "error_msg": row.message,
                    "timestamp": row.time,
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [row.lon, row.lat],
                },
            })
        })
        .collect();
    write_collection(path, features)
}
