//! American odds conversions
//!
//! Positive prices are the profit on a 100 stake, negative prices are the
//! stake needed to win 100. Anything strictly between -100 and +100 is not a
//! valid quote.

use super::OddsError;

/// Probabilities are clamped to `[PROBABILITY_EPSILON, 1 - PROBABILITY_EPSILON]`
/// before being turned into a price.
pub const PROBABILITY_EPSILON: f64 = 1e-6;

fn validate(odds: f64) -> Result<f64, OddsError> {
    if !odds.is_finite() || (odds > -100.0 && odds < 100.0) {
        return Err(OddsError::InvalidOdds(odds));
    }
    Ok(odds)
}

/// Implied probability of an American price
pub fn american_to_probability(odds: f64) -> Result<f64, OddsError> {
    let odds = validate(odds)?;
    if odds >= 100.0 {
        Ok(100.0 / (odds + 100.0))
    } else {
        Ok(-odds / (-odds + 100.0))
    }
}

/// Decimal odds (total return per unit staked, stake included)
pub fn american_to_decimal(odds: f64) -> Result<f64, OddsError> {
    Ok(1.0 + profit_multiplier(odds)?)
}

/// Net profit per unit staked, the `b` of the Kelly formula
pub fn profit_multiplier(odds: f64) -> Result<f64, OddsError> {
    let odds = validate(odds)?;
    if odds > 0.0 {
        Ok(odds / 100.0)
    } else {
        Ok(100.0 / odds.abs())
    }
}

/// Express a probability as a market-style American price.
///
/// Lossy: the result is rounded to the nearest integer and does not map
/// back to `p` exactly.
pub fn probability_to_american(p: f64) -> i32 {
    let p = if p.is_nan() {
        0.5
    } else {
        p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON)
    };

    if p >= 0.5 {
        (-100.0 * p / (1.0 - p)).round() as i32
    } else {
        (100.0 * (1.0 - p) / p).round() as i32
    }
}

/// Expected profit per unit staked at `odds` when the bet wins with probability `p`
pub fn expected_value(odds: f64, p: f64) -> Result<f64, OddsError> {
    let profit = american_to_decimal(odds)? - 1.0;
    Ok(p * profit - (1.0 - p))
}

/// Parse a quoted price such as `"+120"`, `"-110"` or `" 135 "`.
///
/// Returns `None` for blank or unparsable text. Domain validation is left to
/// the conversions.
pub fn parse_american(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}
