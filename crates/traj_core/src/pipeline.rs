//! Pipeline orchestrator: drives normalize → build → call → reconcile for
//! every trip and assembles the output datasets plus the failure ledger.
//!
//! Trips are independent, so the per-trip work fans out across a rayon
//! thread pool; a single collect pass afterwards merges worker outcomes
//! into the output collections, which keeps all appends serialized.

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::ledger::{FailureLedger, FailureRecord};
use crate::matching::{build_trace_request, MatchService};
use crate::normalize::{normalize_positions, TripTrace};
use crate::params::PipelineConfig;
use crate::position::{RawPosition, TripKey};
use crate::reconcile::{reconcile, MatchedPoint, MatchedShape, MatchedTrajectory, MatchedTrip};

/// One row of the points dataset: a snapped coordinate with its trip key
/// and original timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    pub key: TripKey,
    pub point: MatchedPoint,
}

/// Aggregate counters reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched_trips: usize,
    pub failed_trips: usize,
    pub dropped_jumps: usize,
    pub dropped_duplicates: usize,
}

/// Everything one pipeline run produces. All collections are present even
/// when empty; an absent dataset is itself a defect.
#[derive(Debug, Default)]
pub struct RunOutput {
    pub trajectories: Vec<MatchedTrajectory>,
    pub points: Vec<PointRecord>,
    pub shapes: Vec<MatchedShape>,
    pub ledger: FailureLedger,
    pub summary: RunSummary,
}

/// Terminal outcome for one trip. There are no retries and no intermediate
/// states: a trip either matches once or fails once.
enum TripOutcome {
    Matched(MatchedTrip),
    Failed(FailureRecord),
}

fn match_trip(trip: &TripTrace, service: &dyn MatchService, config: &PipelineConfig) -> TripOutcome {
    let attempt = build_trace_request(&trip.points, &config.matching)
        .and_then(|request| service.match_trace(&request));

    match attempt {
        Ok(matched) => {
            debug!(
                "matched vehicle {} trip {} ({} points)",
                trip.key.vehicle_id,
                trip.key.trip_id,
                trip.points.len()
            );
            TripOutcome::Matched(reconcile(trip.key.clone(), &trip.points, matched))
        }
        Err(err) => {
            debug!(
                "failed vehicle {} trip {}: {}",
                trip.key.vehicle_id, trip.key.trip_id, err
            );
            TripOutcome::Failed(FailureRecord {
                key: trip.key.clone(),
                kind: err.kind(),
                message: err.to_string(),
                points: trip.points.clone(),
            })
        }
    }
}

/// Run the full reconstruction pipeline over a collection of raw positions.
///
/// A failure for one trip never aborts the others; every trip ends as either
/// one matched record set or one ledger entry.
pub fn run_pipeline(
    positions: &[RawPosition],
    service: &dyn MatchService,
    config: &PipelineConfig,
) -> RunOutput {
    let report = normalize_positions(positions, &config.normalize);

    let progress = if config.show_progress && !report.trips.is_empty() {
        let bar = ProgressBar::new(report.trips.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .expect("valid progress template")
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let pool = match config.workers {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("failed to create thread pool"),
        None => rayon::ThreadPoolBuilder::new()
            .build()
            .expect("failed to create thread pool"),
    };

    let progress_ref = progress.clone();
    let outcomes: Vec<TripOutcome> = pool.install(|| {
        report
            .trips
            .par_iter()
            .map(|trip| {
                let outcome = match_trip(trip, service, config);
                if let Some(ref bar) = progress_ref {
                    bar.inc(1);
                }
                outcome
            })
            .collect()
    });

    if let Some(ref bar) = progress {
        bar.finish_and_clear();
    }

    let mut output = RunOutput::default();
    for outcome in outcomes {
        match outcome {
            TripOutcome::Matched(trip) => {
                output
                    .points
                    .extend(trip.points.into_iter().map(|point| PointRecord {
                        key: trip.key.clone(),
                        point,
                    }));
                output.trajectories.push(trip.trajectory);
                output.shapes.push(trip.shape);
                output.summary.matched_trips += 1;
            }
            TripOutcome::Failed(record) => {
                output.ledger.record(record);
                output.summary.failed_trips += 1;
            }
        }
    }
    output.summary.dropped_jumps = report.dropped_jumps;
    output.summary.dropped_duplicates = report.dropped_duplicates;

    info!(
        "pipeline run complete: {} matched, {} failed, {} jump points dropped",
        output.summary.matched_trips, output.summary.failed_trips, output.summary.dropped_jumps
    );

    output
}
