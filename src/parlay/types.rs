//! Parlay types

use serde::{Deserialize, Serialize};

use crate::market::{MarketKind, Side};
use crate::pricing::PropKey;
use crate::risk::SidePricing;

/// One priced side usable as a parlay leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayLeg {
    pub game_id: String,
    pub player: String,
    pub team: String,
    pub market: MarketKind,
    pub side: Side,
    /// Absent for anytime touchdowns
    pub line: Option<f64>,
    pub book: Option<String>,
    pub price: f64,
    pub probability: f64,
    pub decimal_odds: f64,
    /// Probability edge in percentage points
    pub edge_pct: f64,
    pub ev: f64,
}

impl ParlayLeg {
    /// Build a leg from a side; `None` unless the side has a valid book price
    pub fn from_side(key: &PropKey, side: &SidePricing, line: Option<f64>) -> Option<Self> {
        Some(Self {
            game_id: key.game_id.clone(),
            player: key.player.clone(),
            team: key.team.clone(),
            market: key.market,
            side: side.side,
            line,
            book: key.book.clone(),
            price: side.price?,
            probability: side.probability,
            decimal_odds: side.decimal_odds?,
            edge_pct: side.edge_pct()?,
            ev: side.ev?,
        })
    }

    /// Short label, e.g. `Player receiving_yards Over 55.5`
    pub fn label(&self) -> String {
        match self.line {
            Some(line) => format!("{} {} {} {}", self.player, self.market, self.side, line),
            None => format!("{} {} {}", self.player, self.market, self.side),
        }
    }
}

/// Combined parlay for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayResult {
    pub bucket: String,
    pub legs: Vec<ParlayLeg>,
    pub probability: f64,
    pub decimal_odds: f64,
    /// Expected profit per unit staked
    pub ev: f64,
}

impl ParlayResult {
    /// Guaranteed-loss placeholder for a bucket with no eligible legs
    pub fn sentinel(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            legs: Vec::new(),
            probability: 0.0,
            decimal_odds: 1.0,
            ev: -1.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Leg labels joined with ` | `
    pub fn describe(&self) -> String {
        self.legs
            .iter()
            .map(ParlayLeg::label)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use crate::market::LineKind;
    use crate::risk::EdgeSizer;

    fn key() -> PropKey {
        PropKey {
            game_id: "BUF@KC".to_string(),
            player: "Receiver".to_string(),
            team: "KC".to_string(),
            market: MarketKind::ReceivingYards,
            book: Some("draftkings".to_string()),
        }
    }

    #[test]
    fn test_leg_from_priced_side() {
        let risk = RiskConfig::default();
        let side = EdgeSizer::new(&risk).price_side(Side::Over, 0.6, Some(-110.0), LineKind::Straight);
        let leg = ParlayLeg::from_side(&key(), &side, Some(55.5)).unwrap();

        assert_eq!(leg.price, -110.0);
        assert!((leg.edge_pct - (0.6 - 110.0 / 210.0) * 100.0).abs() < 1e-9);
        assert!((leg.decimal_odds - (1.0 + 100.0 / 110.0)).abs() < 1e-12);
        assert_eq!(leg.label(), "Receiver receiving_yards Over 55.5");
    }

    #[test]
    fn test_unpriced_side_is_not_a_leg() {
        let risk = RiskConfig::default();
        let sizer = EdgeSizer::new(&risk);
        let missing = sizer.price_side(Side::Over, 0.6, None, LineKind::Straight);
        let invalid = sizer.price_side(Side::Over, 0.6, Some(20.0), LineKind::Straight);

        assert!(ParlayLeg::from_side(&key(), &missing, Some(55.5)).is_none());
        assert!(ParlayLeg::from_side(&key(), &invalid, Some(55.5)).is_none());
    }

    #[test]
    fn test_sentinel() {
        let result = ParlayResult::sentinel("safe");
        assert!(result.is_empty());
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.decimal_odds, 1.0);
        assert_eq!(result.ev, -1.0);
        assert_eq!(result.describe(), "");
    }
}
