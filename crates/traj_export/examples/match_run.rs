//! End-to-end reconstruction run against a live matching service.
//!
//! Reads raw positions from a CSV file, matches every trip, and writes the
//! four output datasets next to the input:
//!
//! ```sh
//! cargo run --example match_run -p traj_export -- \
//!     --positions vehicle_positions.csv \
//!     --endpoint http://localhost:8002
//! ```

use traj_core::matching::ValhallaClient;
use traj_core::params::PipelineConfig;
use traj_core::pipeline::run_pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let positions_path = std::env::args()
        .skip_while(|a| a != "--positions")
        .nth(1)
        .unwrap_or_else(|| "vehicle_positions.csv".to_string());

    let endpoint = std::env::args()
        .skip_while(|a| a != "--endpoint")
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8002".to_string());

    let mut config = PipelineConfig {
        show_progress: true,
        ..PipelineConfig::default()
    };
    config.matching.endpoint = endpoint;

    println!("Trajectory reconstruction");
    println!("=========================");
    println!("Positions: {}", positions_path);
    println!("Endpoint:  {}", config.matching.endpoint);
    println!();

    let positions = traj_export::reader::read_positions_csv(&positions_path)?;
    println!("Read {} raw positions", positions.len());

    let client = ValhallaClient::new(&config.matching);
    let output = run_pipeline(&positions, &client, &config);

    traj_export::geojson::write_trajectories_geojson("map_matched_trips.geojson", &output.trajectories)?;
    traj_export::geojson::write_shapes_geojson("map_matched_shapes.geojson", &output.shapes)?;
    traj_export::geojson::write_failures_geojson("map_matching_errors.geojson", &output.ledger)?;
    traj_export::points_csv::write_points_csv("map_matched_positions.csv", &output.points)?;
    traj_export::points_parquet::write_points_parquet("map_matched_positions.parquet", &output.points)?;

    println!(
        "Matched {} trips, {} failed, {} jump points dropped",
        output.summary.matched_trips, output.summary.failed_trips, output.summary.dropped_jumps
    );
    for (kind, count) in output.ledger.counts_by_kind() {
        println!("  {}: {}", kind.as_str(), count);
    }

    Ok(())
}
