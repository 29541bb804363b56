//! Normal line model and anytime touchdown exposure model
//!
//! Line markets: P(under) = N((line - mean) / sd), P(over) = 1 - P(under).
//! Anytime touchdowns have no line, so they use a Poisson-thinning
//! exposure model instead: P(yes) = 1 - exp(-team_rate * share).

use super::{DistributionModel, SD_FLOOR};

/// Over/under win probabilities for a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineProbabilities {
    pub p_over: f64,
    pub p_under: f64,
}

/// Normal(mean, sd) line model
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalModel;

impl NormalModel {
    pub fn new() -> Self {
        Self
    }
}

impl DistributionModel for NormalModel {
    fn line_probabilities(&self, mean: f64, sd: f64, line: f64) -> LineProbabilities {
        let z = (line - mean) / sd.max(SD_FLOOR);
        let p_under = normal_cdf(z);
        LineProbabilities {
            p_over: 1.0 - p_under,
            p_under,
        }
    }
}

/// Probability a player scores at least once
pub fn touchdown_probability(team_td_rate: f64, player_share: f64) -> f64 {
    let exposure = (team_td_rate * player_share).max(0.0);
    1.0 - (-exposure).exp()
}

/// Standard normal CDF approximation (Abramowitz and Stegun 7.1.26)
pub fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0) - 0.841_344_7).abs() < 1e-6);
        assert!((normal_cdf(-1.96) - 0.024_997_9).abs() < 1e-6);
        assert!(normal_cdf(8.0) > 0.999_999);
        assert!(normal_cdf(-8.0) < 1e-6);
    }

    #[test]
    fn test_line_probabilities_scenario() {
        let probs = NormalModel::new().line_probabilities(60.0, 20.0, 55.5);
        // z = -0.225, N(z) = 0.41099
        assert!((probs.p_over - 0.589).abs() < 1e-3);
        assert!((probs.p_over + probs.p_under - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_at_mean_is_coin_flip() {
        let probs = NormalModel::new().line_probabilities(47.5, 12.0, 47.5);
        assert!((probs.p_over - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_zero_sd_is_floored() {
        let probs = NormalModel::new().line_probabilities(60.0, 0.0, 55.5);
        assert!(probs.p_over > 0.999);
        assert!(probs.p_over.is_finite());
    }

    #[test]
    fn test_touchdown_probability() {
        let p = touchdown_probability(2.3, 0.18);
        assert!((p - (1.0 - (-0.414f64).exp())).abs() < 1e-12);
        assert!((p - 0.3390).abs() < 1e-3);
        assert_eq!(touchdown_probability(0.0, 0.5), 0.0);
        assert_eq!(touchdown_probability(2.3, -1.0), 0.0);
    }
}
