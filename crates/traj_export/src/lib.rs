//! Dataset I/O around the reconstruction pipeline: raw-position ingestion
//! and writers for the trajectory, point, shape, and failure datasets.
//!
//! Interchange geometries are GeoJSON in EPSG:4326 with `[lon, lat]`
//! position order; conversion from the internal representation happens
//! here and only here.

pub mod geojson;
pub mod points_csv;
pub mod points_parquet;
pub mod reader;
