//! Performance model
//!
//! Turns a prior plus context into an adjusted distribution, and the
//! distribution into win probabilities.

mod adjust;
mod distribution;

pub use adjust::{Adjustment, AdjustmentPipeline, SD_FLOOR};
pub use distribution::{normal_cdf, touchdown_probability, LineProbabilities, NormalModel};

/// Trait for line probability models
pub trait DistributionModel: Send + Sync {
    /// Over/under probabilities for `line` given an adjusted distribution
    fn line_probabilities(&self, mean: f64, sd: f64, line: f64) -> LineProbabilities;
}
