//! Sportsbook odds providers

mod the_odds_api;

pub use the_odds_api::{rows_from_events, OddsEvent, TheOddsApi};

use async_trait::async_trait;

use crate::market::QuoteRecord;

/// Source of bookmaker quotes
#[async_trait]
pub trait OddsProvider: Send + Sync {
    /// Fetch quote rows for every configured market
    async fn fetch_quotes(&self) -> anyhow::Result<Vec<QuoteRecord>>;
}
