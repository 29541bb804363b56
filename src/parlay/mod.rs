//! Parlay construction
//!
//! Buckets select the best-edge picked legs from a priced slate and combine
//! them with a per-leg correlation penalty.

mod builder;
mod types;

pub use builder::{combine, ParlayBuilder};
pub use types::{ParlayLeg, ParlayResult};
