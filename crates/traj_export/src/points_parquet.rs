//! Parquet writer for the matched points dataset.

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use traj_core::pipeline::PointRecord;

pub fn write_points_parquet<P: AsRef<Path>>(
    path: P,
    points: &[PointRecord],
) -> Result<(), Box<dyn Error>> {
    let mut vehicle_ids = Vec::with_capacity(points.len());
    let mut trip_ids = Vec::with_capacity(points.len());
    let mut route_ids = Vec::with_capacity(points.len());
    let mut latitudes = Vec::with_capacity(points.len());
    let mut longitudes = Vec::with_capacity(points.len());
    let mut timestamps = Vec::with_capacity(points.len());

    for row in points {
        vehicle_ids.push(row.key.vehicle_id.clone());
        trip_ids.push(row.key.trip_id.clone());
        route_ids.push(row.key.route_id.clone());
        latitudes.push(row.point.lat);
        longitudes.push(row.point.lon);
        timestamps.push(row.point.time);
    }

    let schema = Schema::new(vec![
        Field::new("vehicle_id", DataType::Utf8, false),
        Field::new("trip_id", DataType::Utf8, false),
        Field::new("route_id", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("timestamp", DataType::Int64, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vehicle_ids)),
        Arc::new(StringArray::from(trip_ids)),
        Arc::new(StringArray::from(route_ids)),
        Arc::new(Float64Array::from(latitudes)),
        Arc::new(Float64Array::from(longitudes)),
        Arc::new(Int64Array::from(timestamps)),
    ];

    write_record_batch(path, schema, arrays)
}

fn write_record_batch<P: AsRef<Path>>(
    path: P,
    schema: Schema,
    arrays: Vec<ArrayRef>,
) -> Result<(), Box<dyn Error>> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
