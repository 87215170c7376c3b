//! Position normalizer: groups raw pings into per-trip traces, orders them
//! by time, and filters duplicate readings and implausible GPS jumps.

use std::collections::BTreeMap;

use geo::{Distance, Haversine};
use log::warn;

use crate::params::NormalizeOptions;
use crate::position::{RawPosition, TracePoint, TripKey};

/// One trip's ordered, filtered point sequence. Empty and single-point
/// sequences are valid here; they are rejected downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct TripTrace {
    pub key: TripKey,
    pub points: Vec<TracePoint>,
}

/// Normalizer output: the grouped traces plus explicit drop counters.
#[derive(Clone, Debug, Default)]
pub struct NormalizeReport {
    pub trips: Vec<TripTrace>,
    /// Points dropped because they were further than the configured maximum
    /// from the previous accepted point.
    pub dropped_jumps: usize,
    /// Literal repeat readings (identical time and coordinates).
    pub dropped_duplicates: usize,
}

/// Group raw positions by trip identity, order each group by timestamp
/// (stable on ties), and walk it with a last-accepted cursor:
///
/// - same timestamp, same coordinates: duplicate reading, dropped;
/// - same timestamp, differing coordinates: logged and accepted as a
///   same-instant correction;
/// - haversine distance at or beyond `max_jump_meters`: dropped as a glitch;
/// - otherwise accepted as the new cursor.
///
/// Running the normalizer on its own output yields the same traces.
pub fn normalize_positions(
    positions: &[RawPosition],
    options: &NormalizeOptions,
) -> NormalizeReport {
    let mut groups: BTreeMap<TripKey, Vec<&RawPosition>> = BTreeMap::new();
    for position in positions {
        let route_id = if options.group_by_route {
            position.route_id.clone()
        } else {
            None
        };
        let key = TripKey::new(position.vehicle_id.clone(), position.trip_id.clone(), route_id);
        groups.entry(key).or_default().push(position);
    }

    let mut report = NormalizeReport::default();
    for (mut key, mut group) in groups {
        group.sort_by_key(|position| position.timestamp);
        if !options.group_by_route {
            // Route id of the earliest ping, carried as metadata only.
            key.route_id = group
                .iter()
                .find_map(|position| position.route_id.clone());
        }

        let mut points: Vec<TracePoint> = Vec::with_capacity(group.len());
        for position in group {
            let candidate = TracePoint::from(position);
            let Some(last) = points.last() else {
                points.push(candidate);
                continue;
            };

            if candidate.time == last.time {
                if candidate.lat == last.lat && candidate.lon == last.lon {
                    report.dropped_duplicates += 1;
                    continue;
                }
                warn!(
                    "same-instant coordinate correction for vehicle {} trip {} at t={}",
                    key.vehicle_id, key.trip_id, candidate.time
                );
                points.push(candidate);
                continue;
            }

            let distance_m = Haversine.distance(last.point(), candidate.point());
            if distance_m >= options.max_jump_meters {
                report.dropped_jumps += 1;
                continue;
            }
            points.push(candidate);
        }

        report.trips.push(TripTrace { key, points });
    }

    report
}
