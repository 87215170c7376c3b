//! Pipeline configuration. Plain serde structs with explicit defaults so a
//! full run can be described by (and replayed from) one JSON document.

use serde::{Deserialize, Serialize};

/// Consecutive points further apart than this are treated as GPS glitches.
const DEFAULT_MAX_JUMP_METERS: f64 = 2000.0;

const DEFAULT_ENDPOINT: &str = "http://localhost:8002";
const DEFAULT_COSTING: &str = "auto";
const DEFAULT_SEARCH_RADIUS: u32 = 100;
const DEFAULT_TURN_PENALTY_FACTOR: u32 = 500;
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Controls for grouping and filtering raw positions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Maximum plausible distance between consecutive pings, in meters.
    /// Candidates at or beyond this distance are dropped and counted.
    pub max_jump_meters: f64,
    /// When true, `route_id` participates in trip identity. When false,
    /// trips are keyed on (vehicle, trip) and the route id of the earliest
    /// position is carried as metadata.
    pub group_by_route: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_jump_meters: DEFAULT_MAX_JUMP_METERS,
            group_by_route: true,
        }
    }
}

/// Parameters for the external map-matching service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Base URL of the matching service (e.g. `http://localhost:8002`).
    pub endpoint: String,
    /// Costing profile; vehicles travel on roads, so `auto` by default.
    pub costing: String,
    /// Search radius around each point, in meters.
    pub search_radius: u32,
    /// Penalty factor discouraging implausible turn sequences.
    pub turn_penalty_factor: u32,
    /// Per-call timeout. Expiry surfaces as a transport failure.
    pub timeout_secs: u64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            costing: DEFAULT_COSTING.to_string(),
            search_radius: DEFAULT_SEARCH_RADIUS,
            turn_penalty_factor: DEFAULT_TURN_PENALTY_FACTOR,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Everything one pipeline run needs besides the positions themselves.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub normalize: NormalizeOptions,
    pub matching: MatchOptions,
    /// Worker threads for the per-trip fan-out. None uses rayon's default.
    pub workers: Option<usize>,
    /// Whether to display a progress bar during the run.
    pub show_progress: bool,
}
