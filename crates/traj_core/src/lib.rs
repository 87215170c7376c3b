pub mod ledger;
pub mod matching;
pub mod normalize;
pub mod params;
pub mod pipeline;
pub mod position;
pub mod reconcile;
