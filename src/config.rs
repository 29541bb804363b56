//! Configuration types for prop-edge
//!
//! Every section has defaults, so an empty file is a valid configuration.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::market::MarketKind;

/// Configuration used when no config file is present
pub const EXAMPLE_CONFIG: &str = include_str!("../config.toml.example");

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub volatility: VolatilityConfig,
    pub risk: RiskConfig,
    pub parlays: ParlayConfig,
    pub defaults: DefaultsConfig,
    pub touchdown: TouchdownConfig,
    pub feeds: FeedsConfig,
    pub odds: OddsConfig,
    pub outputs: OutputsConfig,
    pub telemetry: TelemetryConfig,
}

/// Standard deviation widening knobs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Wind speed at or above which sd is widened
    pub wind_threshold_mph: f64,
    /// Relative sd widening for windy games
    pub wind_sd_widen: f64,
    /// Temperature at or below which sd is widened
    pub cold_threshold_f: f64,
    /// Relative sd widening for cold games
    pub cold_sd_widen: f64,
    /// Relative sd widening when the opponent has a top-10 pass rush
    pub widen_sd_if_pressure_top10: f64,
    /// Relative sd widening for low-tier quarterbacks on passing markets
    pub widen_sd_if_qb_lowtier: f64,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            wind_threshold_mph: 15.0,
            wind_sd_widen: 0.10,
            cold_threshold_f: 32.0,
            cold_sd_widen: 0.05,
            widen_sd_if_pressure_top10: 0.08,
            widen_sd_if_qb_lowtier: 0.10,
        }
    }
}

/// Risk and recommendation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Kelly ceiling for straight lines and anytime touchdowns
    pub kelly_cap_straight: f64,
    /// Kelly ceiling for alternate lines
    pub kelly_cap_alt: f64,
    /// EV per unit at or above which a pick is GREEN
    pub edge_green: f64,
    /// EV per unit at or above which a pick is AMBER
    pub edge_amber: f64,
    /// Bankroll used to turn Kelly fractions into stakes
    pub bankroll: Option<Decimal>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            kelly_cap_straight: 0.05,
            kelly_cap_alt: 0.03,
            edge_green: 0.04,
            edge_amber: 0.01,
            bankroll: None,
        }
    }
}

/// Parlay construction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParlayConfig {
    /// Per-leg probability multiplier approximating same-slate correlation
    pub correlation_penalty: f64,
    /// Maximum candidate legs considered per bucket
    pub pool_cap: usize,
    pub buckets: Vec<ParlayBucket>,
}

impl Default for ParlayConfig {
    fn default() -> Self {
        Self {
            correlation_penalty: 0.95,
            pool_cap: 40,
            buckets: vec![
                ParlayBucket::new("safe", 3.0, 2),
                ParlayBucket::new("balanced", 5.0, 3),
                ParlayBucket::new("longshot", 8.0, 5),
            ],
        }
    }
}

/// A named parlay policy
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ParlayBucket {
    pub name: String,
    /// Minimum leg edge in percent; values below 1 are read as fractions
    pub min_edge_pct: f64,
    pub max_legs: usize,
    /// Overrides `parlays.correlation_penalty` for this bucket
    #[serde(default)]
    pub correlation_penalty: Option<f64>,
}

impl ParlayBucket {
    pub fn new(name: impl Into<String>, min_edge_pct: f64, max_legs: usize) -> Self {
        Self {
            name: name.into(),
            min_edge_pct,
            max_legs,
            correlation_penalty: None,
        }
    }

    /// Minimum edge expressed in percentage points
    pub fn min_edge_points(&self) -> f64 {
        if self.min_edge_pct < 1.0 {
            self.min_edge_pct * 100.0
        } else {
            self.min_edge_pct
        }
    }
}

/// Fallback values for missing prior fields
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub sd: SdDefaults,
}

/// Default standard deviation per market
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SdDefaults {
    pub receiving_yards: f64,
    pub receptions: f64,
    pub rushing_yards: f64,
    pub rush_attempts: f64,
    pub passing_yards: f64,
    /// No default for unclassified markets unless configured
    pub other: Option<f64>,
}

impl Default for SdDefaults {
    fn default() -> Self {
        Self {
            receiving_yards: 28.0,
            receptions: 1.6,
            rushing_yards: 22.0,
            rush_attempts: 4.0,
            passing_yards: 45.0,
            other: None,
        }
    }
}

impl SdDefaults {
    /// Default sd for a market, if one exists
    pub fn for_market(&self, market: MarketKind) -> Option<f64> {
        match market {
            MarketKind::ReceivingYards => Some(self.receiving_yards),
            MarketKind::Receptions => Some(self.receptions),
            MarketKind::RushingYards => Some(self.rushing_yards),
            MarketKind::RushAttempts => Some(self.rush_attempts),
            MarketKind::PassingYards => Some(self.passing_yards),
            MarketKind::AnytimeTd => None,
            MarketKind::Other => self.other,
        }
    }
}

/// Anytime touchdown exposure model constants
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TouchdownConfig {
    /// Expected offensive touchdowns per team per game
    pub team_td_rate: f64,
    /// Share of team touchdowns credited to the player
    pub player_share: f64,
}

impl Default for TouchdownConfig {
    fn default() -> Self {
        Self {
            team_td_rate: 2.3,
            player_share: 0.18,
        }
    }
}

/// Public statistical feed locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub team_pace: Option<String>,
    pub team_proe: Option<String>,
    pub team_epa: Option<String>,
    pub rbsdm_qb: Option<String>,
    pub team_pressure: Option<String>,
    /// Multiplier spread per standard deviation of a team metric
    pub factor_scale: f64,
    pub timeout_secs: u64,
    pub retries: u32,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            team_pace: None,
            team_proe: None,
            team_epa: None,
            rbsdm_qb: None,
            team_pressure: None,
            factor_scale: 0.05,
            timeout_secs: 20,
            retries: 3,
        }
    }
}

/// Odds provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OddsConfig {
    pub base_url: String,
    pub sport: String,
    pub region: String,
    pub books: Vec<String>,
    /// Provider market key to model market name
    pub markets: BTreeMap<String, String>,
    pub throttle_ms: u64,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for OddsConfig {
    fn default() -> Self {
        let markets = [
            ("player_reception_yds", "receiving_yards"),
            ("player_receptions", "receptions"),
            ("player_rush_yds", "rushing_yards"),
            ("player_rush_attempts", "rush_attempts"),
            ("player_pass_yds", "passing_yards"),
            ("player_anytime_td", "anytime_td"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            base_url: "https://api.the-odds-api.com/v4/sports".to_string(),
            sport: "americanfootball_nfl".to_string(),
            region: "us".to_string(),
            books: vec![
                "fanduel".to_string(),
                "draftkings".to_string(),
                "betmgm".to_string(),
            ],
            markets,
            throttle_ms: 300,
            api_key_env: "ODDS_API_KEY".to_string(),
        }
    }
}

/// Output sink configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputsConfig {
    pub folder: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("out"),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the bundled example when no file exists there.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or_example(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path)
                .with_context(|| format!("Invalid config file {}", path.display()));
        }

        let config: Config = toml::from_str(EXAMPLE_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pricing code cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        let vol = &self.volatility;
        for (name, widen) in [
            ("volatility.wind_sd_widen", vol.wind_sd_widen),
            ("volatility.cold_sd_widen", vol.cold_sd_widen),
            ("volatility.widen_sd_if_pressure_top10", vol.widen_sd_if_pressure_top10),
            ("volatility.widen_sd_if_qb_lowtier", vol.widen_sd_if_qb_lowtier),
        ] {
            anyhow::ensure!(
                widen.is_finite() && widen >= 0.0,
                "{} must be a non-negative number, got {}",
                name,
                widen
            );
        }

        let risk = &self.risk;
        for (name, cap) in [
            ("risk.kelly_cap_straight", risk.kelly_cap_straight),
            ("risk.kelly_cap_alt", risk.kelly_cap_alt),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&cap),
                "{} must be within [0, 1], got {}",
                name,
                cap
            );
        }
        anyhow::ensure!(
            risk.edge_amber <= risk.edge_green,
            "risk.edge_amber ({}) must not exceed risk.edge_green ({})",
            risk.edge_amber,
            risk.edge_green
        );
        if let Some(bankroll) = risk.bankroll {
            anyhow::ensure!(
                bankroll >= Decimal::ZERO,
                "risk.bankroll must not be negative"
            );
        }

        check_penalty("parlays.correlation_penalty", self.parlays.correlation_penalty)?;
        anyhow::ensure!(self.parlays.pool_cap > 0, "parlays.pool_cap must be positive");
        for bucket in &self.parlays.buckets {
            anyhow::ensure!(!bucket.name.trim().is_empty(), "parlay bucket name is empty");
            anyhow::ensure!(
                bucket.max_legs > 0,
                "parlay bucket {} needs at least one leg",
                bucket.name
            );
            if let Some(penalty) = bucket.correlation_penalty {
                check_penalty(&format!("parlays.buckets.{}", bucket.name), penalty)?;
            }
        }

        anyhow::ensure!(
            self.touchdown.team_td_rate >= 0.0 && self.touchdown.player_share >= 0.0,
            "touchdown rates must not be negative"
        );

        Ok(())
    }
}

fn check_penalty(name: &str, penalty: f64) -> anyhow::Result<()> {
    anyhow::ensure!(
        penalty > 0.0 && penalty <= 1.0,
        "{} must be within (0, 1], got {}",
        name,
        penalty
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [volatility]
            wind_threshold_mph = 18.0
            wind_sd_widen = 0.12
            cold_threshold_f = 25.0
            cold_sd_widen = 0.06
            widen_sd_if_pressure_top10 = 0.07
            widen_sd_if_qb_lowtier = 0.15

            [risk]
            kelly_cap_straight = 0.04
            kelly_cap_alt = 0.02
            edge_green = 0.05
            edge_amber = 0.02
            bankroll = 500.0

            [parlays]
            correlation_penalty = 0.9

            [[parlays.buckets]]
            name = "two_leg"
            min_edge_pct = 4
            max_legs = 2

            [[parlays.buckets]]
            name = "three_leg"
            min_edge_pct = 0.06
            max_legs = 3
            correlation_penalty = 0.85

            [defaults.sd]
            receptions = 1.8
            other = 10.0

            [telemetry]
            log_level = "debug"
            json = true
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.volatility.wind_threshold_mph, 18.0);
        assert_eq!(config.risk.bankroll, Some(dec!(500)));
        assert_eq!(config.parlays.buckets.len(), 2);
        assert_eq!(config.parlays.buckets[1].correlation_penalty, Some(0.85));
        assert_eq!(config.parlays.pool_cap, 40);
        assert_eq!(config.defaults.sd.receptions, 1.8);
        // Unspecified markets keep their defaults
        assert_eq!(config.defaults.sd.passing_yards, 45.0);
        assert_eq!(config.defaults.sd.for_market(MarketKind::Other), Some(10.0));
        assert!(config.telemetry.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.risk.kelly_cap_straight, 0.05);
        assert_eq!(config.risk.edge_green, 0.04);
        assert_eq!(config.risk.edge_amber, 0.01);
        assert_eq!(config.touchdown.team_td_rate, 2.3);
        assert_eq!(config.parlays.buckets.len(), 3);
        assert_eq!(config.odds.markets.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_edge_points() {
        assert_eq!(ParlayBucket::new("a", 5.0, 2).min_edge_points(), 5.0);
        assert!((ParlayBucket::new("b", 0.05, 2).min_edge_points() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sd_defaults_lookup() {
        let sd = SdDefaults::default();
        assert_eq!(sd.for_market(MarketKind::ReceivingYards), Some(28.0));
        assert_eq!(sd.for_market(MarketKind::AnytimeTd), None);
        assert_eq!(sd.for_market(MarketKind::Other), None);
    }

    #[test]
    fn test_validate_rejects_inverted_tiers() {
        let mut config = Config::default();
        config.risk.edge_amber = 0.08;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_penalty() {
        let mut config = Config::default();
        config.parlays.correlation_penalty = 1.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parlays.buckets[0].correlation_penalty = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_widen() {
        let mut config = Config::default();
        config.volatility.cold_sd_widen = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_legs() {
        let mut config = Config::default();
        config.parlays.buckets.push(ParlayBucket::new("empty", 2.0, 0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }
}
