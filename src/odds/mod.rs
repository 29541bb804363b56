//! Odds algebra
//!
//! Conversions between American odds, implied probability and decimal odds,
//! plus two-way margin removal.

mod american;
mod devig;
mod types;

pub use american::{
    american_to_decimal, american_to_probability, expected_value, parse_american,
    probability_to_american, profit_multiplier, PROBABILITY_EPSILON,
};
pub use devig::{devig_american, devig_two_way};
pub use types::OddsError;
