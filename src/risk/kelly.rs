//! Kelly criterion sizing for American-priced bets

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RiskConfig;
use crate::market::LineKind;
use crate::odds::{profit_multiplier, OddsError};

/// Kelly calculator with separate ceilings for main and alternate lines
#[derive(Debug, Clone, Copy)]
pub struct KellyCalculator {
    /// Cap for straight lines and anytime touchdowns
    pub cap_straight: f64,
    /// Cap for alternate lines
    pub cap_alt: f64,
}

impl KellyCalculator {
    pub fn new(cap_straight: f64, cap_alt: f64) -> Self {
        Self {
            cap_straight,
            cap_alt,
        }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.kelly_cap_straight, config.kelly_cap_alt)
    }

    /// Uncapped Kelly fraction: f* = (b*p - q) / b, floored at zero
    ///
    /// `b` is the net profit per unit staked at `price`.
    pub fn full_kelly(price: f64, p: f64) -> Result<f64, OddsError> {
        let b = profit_multiplier(price)?;
        let p = p.clamp(0.0, 1.0);
        let q = 1.0 - p;
        Ok(((b * p - q) / b).max(0.0))
    }

    pub fn cap_for(&self, line_kind: LineKind) -> f64 {
        match line_kind {
            LineKind::Straight => self.cap_straight,
            LineKind::Alt => self.cap_alt,
        }
    }

    /// Kelly fraction capped for the line kind
    pub fn calculate(&self, price: f64, p: f64, line_kind: LineKind) -> Result<f64, OddsError> {
        Ok(Self::full_kelly(price, p)?.min(self.cap_for(line_kind)))
    }

    /// Stake in bankroll units, rounded down to cents
    pub fn stake(fraction: f64, bankroll: Decimal) -> Decimal {
        let fraction = Decimal::from_f64(fraction.max(0.0)).unwrap_or(Decimal::ZERO);
        (bankroll * fraction).round_dp_with_strategy(2, RoundingStrategy::ToZero)
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::from_config(&RiskConfig::default())
    }
}
