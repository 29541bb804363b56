//! Priced row types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::market::{LineKind, MarketKind, Side};
use crate::parlay::ParlayLeg;
use crate::risk::{SidePricing, Tier};

/// Row-level pricing failures; none of these abort a batch.
/// Invalid book odds are not an error: the side stays unpriced and the row
/// carries `Note::InvalidOdds`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// No prior, or a prior without a mean or usable sd
    #[error("Insufficient prior for {player} ({market})")]
    InsufficientPrior { player: String, market: MarketKind },
}

/// Annotation explaining a priced line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Note {
    NoBookPrice,
    InvalidOdds,
    Wind,
    Cold,
    Pressure,
    QbLowtier,
    FastPace,
    StrongTeamEpa,
    DefaultSd,
}

impl Note {
    pub fn as_str(&self) -> &'static str {
        match self {
            Note::NoBookPrice => "no_book_price",
            Note::InvalidOdds => "invalid_odds",
            Note::Wind => "wind",
            Note::Cold => "cold",
            Note::Pressure => "pressure",
            Note::QbLowtier => "qb_lowtier",
            Note::FastPace => "fast_pace",
            Note::StrongTeamEpa => "strong_team_epa",
            Note::DefaultSd => "default_sd",
        }
    }

    /// Comma-joined note list
    pub fn join(notes: &[Note]) -> String {
        notes.iter().map(Note::as_str).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a priced proposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropKey {
    pub game_id: String,
    pub player: String,
    pub team: String,
    pub market: MarketKind,
    pub book: Option<String>,
}

/// Priced over/under line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    pub key: PropKey,
    pub line: f64,
    pub line_kind: LineKind,
    pub adjusted_mean: f64,
    pub adjusted_sd: f64,
    pub over: SidePricing,
    pub under: SidePricing,
    /// Book's vig-free over probability when both prices are valid
    pub no_vig_over: Option<f64>,
    pub pick: Option<Side>,
    pub recommendation: Tier,
    pub notes: Vec<Note>,
}

impl LinePricing {
    pub fn picked(&self) -> Option<&SidePricing> {
        match self.pick? {
            Side::Over => Some(&self.over),
            Side::Under => Some(&self.under),
            Side::Yes => None,
        }
    }

    /// Human-facing recommendation, e.g. `Over 55.5 (GREEN)`
    pub fn bet_label(&self) -> String {
        match self.pick {
            Some(side) => format!("{} {} ({})", side, self.line, self.recommendation),
            None => Tier::Pass.to_string(),
        }
    }
}

/// Priced anytime touchdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryPricing {
    pub key: PropKey,
    pub team_td_rate: f64,
    pub player_share: f64,
    pub p_yes: f64,
    pub yes: SidePricing,
    pub recommendation: Tier,
    pub notes: Vec<Note>,
}

impl BinaryPricing {
    pub fn bet_label(&self) -> String {
        if self.yes.is_priced() {
            format!("Yes ({})", self.recommendation)
        } else {
            Tier::Pass.to_string()
        }
    }
}

/// Output row for one proposition, tagged by market class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum PricedOpportunity {
    Line(LinePricing),
    Binary(BinaryPricing),
}

impl PricedOpportunity {
    pub fn key(&self) -> &PropKey {
        match self {
            PricedOpportunity::Line(l) => &l.key,
            PricedOpportunity::Binary(b) => &b.key,
        }
    }

    pub fn recommendation(&self) -> Tier {
        match self {
            PricedOpportunity::Line(l) => l.recommendation,
            PricedOpportunity::Binary(b) => b.recommendation,
        }
    }

    pub fn bet_label(&self) -> String {
        match self {
            PricedOpportunity::Line(l) => l.bet_label(),
            PricedOpportunity::Binary(b) => b.bet_label(),
        }
    }

    /// The recommended side as a parlay candidate, if it carries a book price
    pub fn picked_leg(&self) -> Option<ParlayLeg> {
        let (side, line) = match self {
            PricedOpportunity::Line(l) => (l.picked()?, Some(l.line)),
            PricedOpportunity::Binary(b) => (&b.yes, None),
        };
        ParlayLeg::from_side(self.key(), side, line)
    }
}

/// A row that could not be priced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub game_id: String,
    pub player: String,
    pub market: MarketKind,
    pub reason: String,
}

/// Result of pricing a slate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub opportunities: Vec<PricedOpportunity>,
    pub skipped: Vec<SkippedRow>,
}

impl PricingReport {
    pub fn new(opportunities: Vec<PricedOpportunity>, skipped: Vec<SkippedRow>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            opportunities,
            skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePricing> {
        self.opportunities.iter().filter_map(|o| match o {
            PricedOpportunity::Line(l) => Some(l),
            PricedOpportunity::Binary(_) => None,
        })
    }

    pub fn binaries(&self) -> impl Iterator<Item = &BinaryPricing> {
        self.opportunities.iter().filter_map(|o| match o {
            PricedOpportunity::Binary(b) => Some(b),
            PricedOpportunity::Line(_) => None,
        })
    }

    /// Picked legs across all rows by edge, highest first (stable)
    pub fn top_edges(&self, n: usize) -> Vec<ParlayLeg> {
        let mut legs: Vec<ParlayLeg> = self
            .opportunities
            .iter()
            .filter_map(PricedOpportunity::picked_leg)
            .collect();
        legs.sort_by(|a, b| b.edge_pct.total_cmp(&a.edge_pct));
        legs.truncate(n);
        legs
    }

    pub fn count_tier(&self, tier: Tier) -> usize {
        self.opportunities
            .iter()
            .filter(|o| o.recommendation() == tier)
            .count()
    }
}
