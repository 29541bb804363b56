//! Risk module
//!
//! Kelly sizing with per-line-kind caps, edge measurement and
//! recommendation tiers.

mod kelly;
mod sizing;

pub use kelly::KellyCalculator;
pub use sizing::{EdgeSizer, SidePricing, Tier};
