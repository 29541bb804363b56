//! Quote and prior types

use serde::{Deserialize, Serialize};

use super::{LineKind, MarketKind};
use crate::odds::parse_american;

/// What the book is offering on a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Proposition {
    /// Over/under a continuous line
    OverUnder {
        line: f64,
        price_over: Option<f64>,
        price_under: Option<f64>,
    },
    /// Yes-only binary market (anytime touchdown)
    Yes { price_yes: Option<f64> },
}

/// One bookmaker-priced proposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub game_id: String,
    pub player: String,
    pub team: String,
    pub opponent: Option<String>,
    pub market: MarketKind,
    pub line_kind: LineKind,
    pub book: Option<String>,
    pub proposition: Proposition,
}

impl Quote {
    /// Over/under quote on the main line
    pub fn over_under(
        game_id: impl Into<String>,
        player: impl Into<String>,
        team: impl Into<String>,
        market: MarketKind,
        line: f64,
        price_over: Option<f64>,
        price_under: Option<f64>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            player: player.into(),
            team: team.into(),
            opponent: None,
            market,
            line_kind: LineKind::Straight,
            book: None,
            proposition: Proposition::OverUnder {
                line,
                price_over,
                price_under,
            },
        }
    }

    /// Anytime touchdown quote
    pub fn anytime_td(
        game_id: impl Into<String>,
        player: impl Into<String>,
        team: impl Into<String>,
        price_yes: Option<f64>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            player: player.into(),
            team: team.into(),
            opponent: None,
            market: MarketKind::AnytimeTd,
            line_kind: LineKind::Straight,
            book: None,
            proposition: Proposition::Yes { price_yes },
        }
    }

    pub fn with_opponent(mut self, opponent: impl Into<String>) -> Self {
        self.opponent = Some(opponent.into());
        self
    }

    pub fn with_line_kind(mut self, line_kind: LineKind) -> Self {
        self.line_kind = line_kind;
        self
    }

    pub fn with_book(mut self, book: impl Into<String>) -> Self {
        self.book = Some(book.into());
        self
    }

    /// Line for over/under quotes
    pub fn line(&self) -> Option<f64> {
        match self.proposition {
            Proposition::OverUnder { line, .. } => Some(line),
            Proposition::Yes { .. } => None,
        }
    }

    /// Build a quote from a loosely-typed loader row.
    ///
    /// Returns `None` when the row cannot describe a proposition: a line
    /// market without a usable line.
    pub fn from_record(record: QuoteRecord) -> Option<Self> {
        let market = MarketKind::parse(&record.market);
        let line_kind = if record.alt.unwrap_or(false) {
            LineKind::Alt
        } else {
            LineKind::Straight
        };

        let proposition = if market.is_binary() {
            let price = record
                .price_yes
                .as_ref()
                .or(record.price_over.as_ref())
                .and_then(PriceField::value);
            Proposition::Yes { price_yes: price }
        } else {
            let line = record.line.filter(|l| l.is_finite())?;
            Proposition::OverUnder {
                line,
                price_over: record.price_over.as_ref().and_then(PriceField::value),
                price_under: record.price_under.as_ref().and_then(PriceField::value),
            }
        };

        Some(Self {
            game_id: record.game_id,
            player: record.player.trim().to_string(),
            team: record.team.unwrap_or_default().trim().to_string(),
            opponent: record
                .opponent
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty()),
            market,
            line_kind,
            book: record.book,
            proposition,
        })
    }
}

/// A price as delivered by a loader: a number or text like `"+120"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    pub fn value(&self) -> Option<f64> {
        match self {
            PriceField::Number(v) if v.is_finite() => Some(*v),
            PriceField::Number(_) => None,
            PriceField::Text(s) => parse_american(s),
        }
    }
}

/// Quote row as read from a snapshot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteRecord {
    #[serde(default)]
    pub game_id: String,
    pub player: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
    pub market: String,
    #[serde(default)]
    pub line: Option<f64>,
    #[serde(default, alias = "odds_over")]
    pub price_over: Option<PriceField>,
    #[serde(default, alias = "odds_under")]
    pub price_under: Option<PriceField>,
    #[serde(default, alias = "odds_yes")]
    pub price_yes: Option<PriceField>,
    #[serde(default)]
    pub alt: Option<bool>,
    #[serde(default)]
    pub book: Option<String>,
}

/// Statistical belief about a player's output on a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prior {
    pub player: String,
    pub team: String,
    pub market: MarketKind,
    pub mean: Option<f64>,
    pub sd: Option<f64>,
}

impl Prior {
    pub fn new(
        player: impl Into<String>,
        team: impl Into<String>,
        market: MarketKind,
        mean: Option<f64>,
        sd: Option<f64>,
    ) -> Self {
        Self {
            player: player.into(),
            team: team.into(),
            market,
            mean,
            sd,
        }
    }
}

/// Prior row as read from a snapshot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriorRecord {
    pub player: String,
    #[serde(default)]
    pub team: Option<String>,
    pub market: String,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub sd: Option<f64>,
}

impl From<PriorRecord> for Prior {
    fn from(record: PriorRecord) -> Self {
        Self {
            player: record.player.trim().to_string(),
            team: record.team.unwrap_or_default().trim().to_string(),
            market: MarketKind::parse(&record.market),
            mean: record.mean.filter(|m| m.is_finite()),
            sd: record.sd.filter(|s| s.is_finite()),
        }
    }
}
