//! Contextual adjustment signals
//!
//! Team multipliers, usage, weather, matchup flags and touchdown exposure
//! inputs, plus the adapter that derives them from public stat feeds.

mod columns;
mod feeds;
mod signals;

pub use columns::{resolve_column, ColumnRule};
pub use feeds::{FeedError, FeedLoader, FeedMods, FeedTable};
pub use signals::{
    ContextRecord, ContextSignals, Matchup, ScheduleRecord, TeamFactorRecord, TeamFactors,
    UsageAdjustment, UsageRecord, Weather, WeatherRecord,
};
