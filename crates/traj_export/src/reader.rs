//! Raw-position ingestion from CSV.
//!
//! Expected header: `vehicle_id,trip_id,route_id,latitude,longitude,
//! timestamp,bearing` with `timestamp` in epoch seconds. `route_id` and
//! `bearing` may be empty.

use std::error::Error;
use std::path::Path;

use traj_core::position::RawPosition;

pub fn read_positions_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawPosition>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut positions = Vec::new();
    for row in reader.deserialize() {
        let position: RawPosition = row?;
        positions.push(position);
    }
    Ok(positions)
}
