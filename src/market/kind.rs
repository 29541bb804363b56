//! Market classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical player-prop market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    ReceivingYards,
    Receptions,
    RushingYards,
    RushAttempts,
    PassingYards,
    AnytimeTd,
    Other,
}

impl MarketKind {
    /// Classify a free-form market name.
    ///
    /// Accepts canonical names, display names ("Receiving Yards"), the
    /// `rec_` shorthand and provider keys such as `player_reception_yds`.
    pub fn parse(raw: &str) -> Self {
        let m = raw.trim().to_lowercase().replace([' ', '-'], "_");
        let has = |needle: &str| m.contains(needle);
        let yards = has("yard") || has("yds");

        if has("anytime") && has("td") {
            MarketKind::AnytimeTd
        } else if (has("receiving") || has("reception")) && yards {
            MarketKind::ReceivingYards
        } else if has("receptions") || m.starts_with("rec_") {
            MarketKind::Receptions
        } else if has("rush") && has("att") {
            MarketKind::RushAttempts
        } else if has("rush") && yards {
            MarketKind::RushingYards
        } else if has("pass") && yards {
            MarketKind::PassingYards
        } else {
            MarketKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::ReceivingYards => "receiving_yards",
            MarketKind::Receptions => "receptions",
            MarketKind::RushingYards => "rushing_yards",
            MarketKind::RushAttempts => "rush_attempts",
            MarketKind::PassingYards => "passing_yards",
            MarketKind::AnytimeTd => "anytime_td",
            MarketKind::Other => "other",
        }
    }

    /// Passing markets are the ones exposed to quarterback tier widening
    pub fn is_passing(&self) -> bool {
        matches!(self, MarketKind::PassingYards)
    }

    /// Binary yes/no market with no continuous line
    pub fn is_binary(&self) -> bool {
        matches!(self, MarketKind::AnytimeTd)
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bet side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Over,
    Under,
    Yes,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Over => "Over",
            Side::Under => "Under",
            Side::Yes => "Yes",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main line or one of the book's alternate lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Straight,
    Alt,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Straight => "straight",
            LineKind::Alt => "alt",
        }
    }
}
