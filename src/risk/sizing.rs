//! Edge measurement, recommendation tiers and side selection
//!
//! Two edge forms are carried for every priced side:
//! - `ev`: expected profit per unit staked, used for tiering and side choice
//! - `edge`: model probability minus implied probability, used for
//!   percentage display and parlay leg ranking

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::KellyCalculator;
use crate::config::RiskConfig;
use crate::market::{LineKind, Side};
use crate::odds::{american_to_decimal, american_to_probability, expected_value, probability_to_american};

/// Recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Green,
    Amber,
    Red,
    /// No side carries a usable book price
    Pass,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Green => "GREEN",
            Tier::Amber => "AMBER",
            Tier::Red => "RED",
            Tier::Pass => "Pass",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pricing for one side of a proposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePricing {
    pub side: Side,
    /// Book price as quoted, valid or not
    pub price: Option<f64>,
    /// Model win probability
    pub probability: f64,
    /// Model probability as an American price
    pub fair_odds: i32,
    /// Book implied probability
    pub implied: Option<f64>,
    /// probability - implied
    pub edge: Option<f64>,
    /// Expected profit per unit staked
    pub ev: Option<f64>,
    pub decimal_odds: Option<f64>,
    /// Capped Kelly fraction, zero when unpriced
    pub kelly: f64,
    pub stake: Option<Decimal>,
    /// A price was quoted but lies outside the American odds domain
    pub invalid_price: bool,
}

impl SidePricing {
    /// Edge in percentage points
    pub fn edge_pct(&self) -> Option<f64> {
        self.edge.map(|e| e * 100.0)
    }

    /// Side carries a valid book price
    pub fn is_priced(&self) -> bool {
        self.implied.is_some()
    }
}

/// Prices sides against the book and classifies the result
#[derive(Debug, Clone)]
pub struct EdgeSizer<'a> {
    risk: &'a RiskConfig,
    kelly: KellyCalculator,
}

impl<'a> EdgeSizer<'a> {
    pub fn new(risk: &'a RiskConfig) -> Self {
        Self {
            risk,
            kelly: KellyCalculator::from_config(risk),
        }
    }

    /// Price one side at the book's quote
    pub fn price_side(
        &self,
        side: Side,
        probability: f64,
        price: Option<f64>,
        line_kind: LineKind,
    ) -> SidePricing {
        let mut pricing = SidePricing {
            side,
            price,
            probability,
            fair_odds: probability_to_american(probability),
            implied: None,
            edge: None,
            ev: None,
            decimal_odds: None,
            kelly: 0.0,
            stake: None,
            invalid_price: false,
        };

        let Some(price) = price else {
            return pricing;
        };

        let priced = american_to_probability(price).and_then(|implied| {
            Ok((
                implied,
                expected_value(price, probability)?,
                american_to_decimal(price)?,
                self.kelly.calculate(price, probability, line_kind)?,
            ))
        });

        match priced {
            Ok((implied, ev, decimal_odds, kelly)) => {
                pricing.implied = Some(implied);
                pricing.edge = Some(probability - implied);
                pricing.ev = Some(ev);
                pricing.decimal_odds = Some(decimal_odds);
                pricing.kelly = kelly;
                pricing.stake = self.risk.bankroll.map(|b| KellyCalculator::stake(kelly, b));
            }
            Err(e) => {
                tracing::debug!(side = %side, error = %e, "Side left unpriced");
                pricing.invalid_price = true;
            }
        }

        pricing
    }

    /// Tier for an EV edge
    pub fn tier(&self, ev: Option<f64>) -> Tier {
        match ev {
            None => Tier::Pass,
            Some(ev) if ev >= self.risk.edge_green => Tier::Green,
            Some(ev) if ev >= self.risk.edge_amber => Tier::Amber,
            Some(_) => Tier::Red,
        }
    }

    /// Pick the side with the highest EV.
    ///
    /// Unpriced sides never win. On equal EV the earlier side wins, and
    /// callers list Over before Under.
    pub fn pick<'s>(&self, sides: &'s [SidePricing]) -> Option<&'s SidePricing> {
        sides
            .iter()
            .filter_map(|s| s.ev.map(|ev| (ev, s)))
            .fold(None, |best: Option<(f64, &SidePricing)>, (ev, s)| match best {
                Some((best_ev, _)) if best_ev >= ev => best,
                _ => Some((ev, s)),
            })
            .map(|(_, s)| s)
    }
}
