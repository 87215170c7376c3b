//! CSV writer for the matched points dataset.

use std::error::Error;
use std::path::Path;

use chrono::DateTime;
use traj_core::pipeline::PointRecord;

/// One row per snapped point: trip key, snapped coordinate, and the
/// original feed timestamp formatted as RFC3339.
pub fn write_points_csv<P: AsRef<Path>>(
    path: P,
    points: &[PointRecord],
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "vehicle_id",
        "trip_id",
        "route_id",
        "latitude",
        "longitude",
        "timestamp",
    ])?;

    for row in points {
        writer.write_record([
            row.key.vehicle_id.as_str(),
            row.key.trip_id.as_str(),
            row.key.route_id.as_deref().unwrap_or(""),
            &row.point.lat.to_string(),
            &row.point.lon.to_string(),
            &format_timestamp(row.point.time),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn format_timestamp(epoch_seconds: i64) -> String {
    match DateTime::from_timestamp(epoch_seconds, 0) {
        Some(instant) => instant.to_rfc3339(),
        // Out-of-range instants keep the raw value instead of corrupting the row.
        None => epoch_seconds.to_string(),
    }
}
