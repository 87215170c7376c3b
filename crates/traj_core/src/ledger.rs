//! Failure ledger: append-only record of every trip that could not be
//! matched, retaining the full offending point sequence for inspection.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::matching::FailureKind;
use crate::position::{TracePoint, TripKey};

/// One failed trip. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailureRecord {
    pub key: TripKey,
    pub kind: FailureKind,
    pub message: String,
    pub points: Vec<TracePoint>,
}

/// Point-level view of a failure, one row per offending trace point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailurePoint {
    pub key: TripKey,
    pub kind: FailureKind,
    pub message: String,
    pub lat: f64,
    pub lon: f64,
    pub time: i64,
}

/// Accumulates failure records during a single pipeline run. A trip either
/// succeeds exactly once or fails exactly once, so at most one record may
/// exist per key.
#[derive(Debug, Default)]
pub struct FailureLedger {
    records: Vec<FailureRecord>,
    keys: HashSet<TripKey>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. A second record for the same key is a programming
    /// defect upstream; it is asserted in debug builds and ignored otherwise
    /// so a release run never duplicates ledger entries.
    pub fn record(&mut self, record: FailureRecord) {
        debug_assert!(
            !self.keys.contains(&record.key),
            "duplicate failure record for {:?}",
            record.key
        );
        if self.keys.insert(record.key.clone()) {
            self.records.push(record);
        }
    }

    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flatten to one row per offending trace point. Every point of every
    /// failed trip is retained; nothing is discarded silently.
    pub fn export_points(&self) -> Vec<FailurePoint> {
        self.records
            .iter()
            .flat_map(|record| {
                record.points.iter().map(|point| FailurePoint {
                    key: record.key.clone(),
                    kind: record.kind,
                    message: record.message.clone(),
                    lat: point.lat,
                    lon: point.lon,
                    time: point.time,
                })
            })
            .collect()
    }

    /// Failure counts per kind, for end-of-run summaries.
    pub fn counts_by_kind(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.kind).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vehicle: &str, kind: FailureKind, point_count: usize) -> FailureRecord {
        let points = (0..point_count)
            .map(|i| TracePoint {
                lat: 52.52 + i as f64 * 0.001,
                lon: 13.405,
                time: 100 + i as i64,
                heading: None,
            })
            .collect();
        FailureRecord {
            key: TripKey::new(vehicle, "t1", None),
            kind,
            message: "test failure".to_string(),
            points,
        }
    }

    #[test]
    fn keeps_at_most_one_record_per_key() {
        let mut ledger = FailureLedger::new();
        ledger.record(record("v1", FailureKind::TransportError, 2));

        let duplicate = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ledger.record(record("v1", FailureKind::ApplicationError, 2));
        }));
        // Debug builds assert; either way the first record wins.
        let _ = duplicate;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].kind, FailureKind::TransportError);
    }

    #[test]
    fn export_retains_every_offending_point() {
        let mut ledger = FailureLedger::new();
        ledger.record(record("v1", FailureKind::UnresolvedTracepoint, 3));
        ledger.record(record("v2", FailureKind::InsufficientPoints, 1));

        let rows = ledger.export_points();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| !row.message.is_empty()));
        assert_eq!(rows[0].kind, FailureKind::UnresolvedTracepoint);
        assert_eq!(rows[3].kind, FailureKind::InsufficientPoints);
    }

    #[test]
    fn counts_group_by_kind() {
        let mut ledger = FailureLedger::new();
        ledger.record(record("v1", FailureKind::TransportError, 2));
        ledger.record(record("v2", FailureKind::TransportError, 2));
        ledger.record(record("v3", FailureKind::InsufficientPoints, 1));

        let counts = ledger.counts_by_kind();
        assert_eq!(counts.get(&FailureKind::TransportError), Some(&2));
        assert_eq!(counts.get(&FailureKind::InsufficientPoints), Some(&1));
        assert_eq!(counts.get(&FailureKind::ApplicationError), None);
    }
}
