//! Odds error types

use thiserror::Error;

/// Errors raised by the odds conversions
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OddsError {
    /// Price outside the American odds domain (-100, 100) or not finite
    #[error("Invalid American odds: {0}")]
    InvalidOdds(f64),
}
