//! Slate pricing
//!
//! Runs every quote through adjustment, distribution and edge sizing and
//! collects the priced rows into a report.

mod engine;
mod priors;
mod types;

pub use engine::SlatePricer;
pub use priors::PriorBook;
pub use types::{
    BinaryPricing, LinePricing, Note, PricedOpportunity, PricingError, PricingReport, PropKey,
    SkippedRow,
};
