use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Point;
use geo_types::LineString;
use reqwest::StatusCode;
use traj_core::matching::{FailureKind, MatchError, MatchService, TraceMatch, TraceRequest};
use traj_core::params::PipelineConfig;
use traj_core::pipeline::run_pipeline;
use traj_core::position::RawPosition;

/// Snaps every input point to itself and returns the input as geometry,
/// counting how many calls reach the service boundary.
#[derive(Default)]
struct EchoService {
    calls: AtomicUsize,
}

impl MatchService for EchoService {
    fn match_trace(&self, request: &TraceRequest) -> Result<TraceMatch, MatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let snapped: Vec<Point<f64>> = request
            .shape
            .iter()
            .map(|point| Point::new(point.lon, point.lat))
            .collect();
        let geometry: LineString<f64> = snapped.iter().map(|point| point.0).collect();
        Ok(TraceMatch { snapped, geometry })
    }
}

/// Always fails the way the client classifies an HTTP 500.
struct ServerErrorService;

impl MatchService for ServerErrorService {
    fn match_trace(&self, _request: &TraceRequest) -> Result<TraceMatch, MatchError> {
        Err(MatchError::Status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        ))
    }
}

/// Reports the second input point as unresolved, as the parser does when
/// the service returns a null tracepoint.
struct NullTracepointService;

impl MatchService for NullTracepointService {
    fn match_trace(&self, _request: &TraceRequest) -> Result<TraceMatch, MatchError> {
        Err(MatchError::UnresolvedTracepoint(1))
    }
}

fn position(vehicle: &str, trip: &str, lat: f64, lon: f64, timestamp: i64) -> RawPosition {
    RawPosition {
        vehicle_id: vehicle.to_string(),
        trip_id: trip.to_string(),
        route_id: Some("r1".to_string()),
        latitude: lat,
        longitude: lon,
        timestamp,
        bearing: None,
    }
}

fn sequential_config() -> PipelineConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    PipelineConfig {
        workers: Some(1),
        show_progress: false,
        ..PipelineConfig::default()
    }
}

#[test]
fn two_close_points_yield_one_trajectory() {
    // Scenario A: two points 1 second and ~50m apart.
    let positions = vec![
        position("v1", "t1", 52.52000, 13.4050, 100),
        position("v1", "t1", 52.52045, 13.4050, 101),
    ];

    let service = EchoService::default();
    let output = run_pipeline(&positions, &service, &sequential_config());

    assert_eq!(output.summary.matched_trips, 1);
    assert_eq!(output.summary.failed_trips, 0);
    assert_eq!(output.trajectories.len(), 1);
    assert_eq!(output.trajectories[0].geometry.0.len(), 2);
    assert_eq!(output.shapes.len(), 1);
    assert!(output.ledger.is_empty());

    // Snapped points keep the original timestamps bit-exact, in order.
    let times: Vec<i64> = output.points.iter().map(|row| row.point.time).collect();
    assert_eq!(times, vec![100, 101]);
}

#[test]
fn gps_jump_is_dropped_before_matching() {
    // Scenario B: the middle point is ~5km from its neighbors.
    let positions = vec![
        position("v1", "t1", 52.52000, 13.4050, 100),
        position("v1", "t1", 52.56500, 13.4050, 101),
        position("v1", "t1", 52.52045, 13.4050, 102),
    ];

    let service = EchoService::default();
    let output = run_pipeline(&positions, &service, &sequential_config());

    assert_eq!(output.summary.dropped_jumps, 1);
    assert_eq!(output.summary.matched_trips, 1);
    assert_eq!(output.trajectories[0].geometry.0.len(), 2);
    assert_eq!(
        output.points.iter().map(|row| row.point.time).collect::<Vec<_>>(),
        vec![100, 102]
    );
}

#[test]
fn single_point_trip_fails_without_a_service_call() {
    // Scenario C: one point is not matchable; the service is never reached.
    let positions = vec![position("v1", "t1", 52.52, 13.405, 100)];

    let service = EchoService::default();
    let output = run_pipeline(&positions, &service, &sequential_config());

    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    assert_eq!(output.summary.matched_trips, 0);
    assert_eq!(output.summary.failed_trips, 1);
    assert_eq!(output.summary.dropped_jumps, 0);
    assert!(output.trajectories.is_empty());
    assert!(output.points.is_empty());
    assert!(output.shapes.is_empty());

    let record = &output.ledger.records()[0];
    assert_eq!(record.kind, FailureKind::InsufficientPoints);
    assert_eq!(record.points.len(), 1);
}

#[test]
fn server_error_becomes_a_transport_failure() {
    // Scenario D: HTTP 500 is recorded, never raised.
    let positions = vec![
        position("v1", "t1", 52.52000, 13.4050, 100),
        position("v1", "t1", 52.52045, 13.4050, 101),
    ];

    let output = run_pipeline(&positions, &ServerErrorService, &sequential_config());

    assert_eq!(output.summary.failed_trips, 1);
    assert!(output.trajectories.is_empty());

    let record = &output.ledger.records()[0];
    assert_eq!(record.kind, FailureKind::TransportError);
    assert!(record.message.contains("500"));
    assert!(record.message.contains("Internal Server Error"));
    assert_eq!(record.points.len(), 2);
}

#[test]
fn null_tracepoint_fails_the_whole_trip() {
    let positions = vec![
        position("v1", "t1", 52.52000, 13.4050, 100),
        position("v1", "t1", 52.52045, 13.4050, 101),
    ];

    let output = run_pipeline(&positions, &NullTracepointService, &sequential_config());

    assert_eq!(output.summary.matched_trips, 0);
    assert!(output.trajectories.is_empty());
    assert!(output.points.is_empty());

    let record = &output.ledger.records()[0];
    assert_eq!(record.kind, FailureKind::UnresolvedTracepoint);
}

#[test]
fn one_failing_trip_never_aborts_the_others() {
    let mut positions = vec![
        position("v1", "t1", 52.52000, 13.4050, 100),
        position("v1", "t1", 52.52045, 13.4050, 101),
    ];
    // Second trip has a single point and will fail locally.
    positions.push(position("v2", "t2", 52.53, 13.41, 100));

    let service = EchoService::default();
    let output = run_pipeline(&positions, &service, &sequential_config());

    assert_eq!(output.summary.matched_trips, 1);
    assert_eq!(output.summary.failed_trips, 1);
    assert_eq!(output.ledger.len(), 1);
}

#[test]
fn parallel_run_matches_sequential_totals() {
    let mut positions = Vec::new();
    for trip in 0..8 {
        for step in 0..4 {
            positions.push(position(
                &format!("v{trip}"),
                &format!("t{trip}"),
                52.5200 + step as f64 * 0.0004,
                13.4050,
                100 + step,
            ));
        }
    }

    let service = EchoService::default();
    let config = PipelineConfig {
        workers: Some(4),
        show_progress: false,
        ..PipelineConfig::default()
    };
    let output = run_pipeline(&positions, &service, &config);

    assert_eq!(output.summary.matched_trips, 8);
    assert_eq!(output.summary.failed_trips, 0);
    assert_eq!(output.points.len(), 32);
    assert_eq!(service.calls.load(Ordering::SeqCst), 8);
}
