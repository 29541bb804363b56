//! Margin removal for two-way markets

use super::american_to_probability;

/// Renormalize two opposing implied probabilities so they sum to one.
///
/// Returns `None` when the pair cannot be normalized (sum not positive).
pub fn devig_two_way(p_a: f64, p_b: f64) -> Option<(f64, f64)> {
    let sum = p_a + p_b;
    if !sum.is_finite() || sum <= 0.0 {
        return None;
    }
    Some((p_a / sum, p_b / sum))
}

/// Vig-free probabilities for an over/under price pair
pub fn devig_american(price_a: f64, price_b: f64) -> Option<(f64, f64)> {
    let p_a = american_to_probability(price_a).ok()?;
    let p_b = american_to_probability(price_b).ok()?;
    devig_two_way(p_a, p_b)
}
