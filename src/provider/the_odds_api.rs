//! The Odds API client
//!
//! One request per market key against `/{sport}/odds`. Player props come
//! back as outcomes carrying the player in `description`, the side in
//! `name`, and the line in `point`.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use super::OddsProvider;
use crate::config::OddsConfig;
use crate::market::{MarketKind, PriceField, QuoteRecord};

/// Request timeout for odds calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Debug, Clone, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub bookmakers: Vec<OddsBookmaker>,
}

impl OddsEvent {
    /// `AWAY@HOME`, upper-cased
    pub fn game_id(&self) -> String {
        let home = self.home_team.to_uppercase();
        let away = self
            .away_team
            .clone()
            .or_else(|| {
                self.teams
                    .iter()
                    .find(|t| t.to_uppercase() != home)
                    .cloned()
            })
            .unwrap_or_default()
            .to_uppercase();
        format!("{}@{}", away, home)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsBookmaker {
    pub key: String,
    #[serde(default)]
    pub markets: Vec<OddsMarket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<OddsOutcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsOutcome {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub point: Option<f64>,
}

impl OddsOutcome {
    fn player(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name).trim()
    }

    /// A Yes/No outcome names its side in `name`; only the Yes side is a
    /// quote. Outcomes without a description carry the player in `name`.
    fn is_yes_side(&self) -> bool {
        self.description.is_none() || self.name.trim().eq_ignore_ascii_case("yes")
    }
}

#[derive(Debug, Default)]
struct LinePrices {
    over: Option<f64>,
    under: Option<f64>,
}

/// Convert one market's events into quote rows.
///
/// Outcomes are grouped by (player, point) per book; a player quoted at
/// more than one point in the same book and market is flagged alternate.
pub fn rows_from_events(market_key: &str, model_market: &str, events: &[OddsEvent]) -> Vec<QuoteRecord> {
    let binary = MarketKind::parse(model_market).is_binary();
    let mut rows = Vec::new();

    for event in events {
        let game_id = event.game_id();
        for book in &event.bookmakers {
            for market in book.markets.iter().filter(|m| m.key == market_key) {
                let row = |player: &str| QuoteRecord {
                    game_id: game_id.clone(),
                    player: player.to_string(),
                    team: None,
                    opponent: None,
                    market: model_market.to_string(),
                    line: None,
                    price_over: None,
                    price_under: None,
                    price_yes: None,
                    alt: None,
                    book: Some(book.key.clone()),
                };

                if binary {
                    for outcome in market.outcomes.iter().filter(|o| o.is_yes_side()) {
                        let player = outcome.player();
                        match outcome.price {
                            Some(price) if !player.is_empty() => rows.push(QuoteRecord {
                                price_yes: Some(PriceField::Number(price)),
                                ..row(player)
                            }),
                            _ => {}
                        }
                    }
                    continue;
                }

                // insertion order of (player, point) is kept for stable output
                let mut lines: Vec<((String, f64), LinePrices)> = Vec::new();
                for outcome in &market.outcomes {
                    let player = outcome.player();
                    let (Some(price), Some(point)) = (outcome.price, outcome.point) else {
                        continue;
                    };
                    if player.is_empty() {
                        continue;
                    }
                    let idx = match lines
                        .iter()
                        .position(|((p, pt), _)| p == player && *pt == point)
                    {
                        Some(idx) => idx,
                        None => {
                            lines.push(((player.to_string(), point), LinePrices::default()));
                            lines.len() - 1
                        }
                    };
                    let side = outcome.name.to_lowercase();
                    if side.contains("over") {
                        lines[idx].1.over = Some(price);
                    } else if side.contains("under") {
                        lines[idx].1.under = Some(price);
                    }
                }

                let mut points_per_player: HashMap<&str, usize> = HashMap::new();
                for ((player, _), _) in &lines {
                    *points_per_player.entry(player.as_str()).or_default() += 1;
                }

                for ((player, point), prices) in &lines {
                    rows.push(QuoteRecord {
                        line: Some(*point),
                        price_over: prices.over.map(PriceField::Number),
                        price_under: prices.under.map(PriceField::Number),
                        alt: Some(points_per_player.get(player.as_str()).copied().unwrap_or(1) > 1),
                        ..row(player)
                    });
                }
            }
        }
    }

    rows
}

/// Client for The Odds API v4
pub struct TheOddsApi {
    config: OddsConfig,
    api_key: String,
    client: Client,
}

impl TheOddsApi {
    pub fn new(config: OddsConfig, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            config,
            api_key: api_key.into(),
            client,
        })
    }

    /// Build a client with the key read from `odds.api_key_env`
    pub fn from_env(config: OddsConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .with_context(|| format!("{} is not set", config.api_key_env))?;
        Self::new(config, api_key)
    }

    async fn fetch_market(&self, market_key: &str) -> anyhow::Result<Vec<OddsEvent>> {
        let url = format!("{}/{}/odds", self.config.base_url, self.config.sport);
        let books = self.config.books.join(",");

        tracing::debug!(url = %url, market = market_key, "Fetching odds");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.config.region.as_str()),
                ("oddsFormat", "american"),
                ("markets", market_key),
                ("bookmakers", books.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Odds API error: {} - {}", status, body);
        }

        let events: Vec<OddsEvent> = response.json().await?;
        Ok(events)
    }
}

#[async_trait]
impl OddsProvider for TheOddsApi {
    async fn fetch_quotes(&self) -> anyhow::Result<Vec<QuoteRecord>> {
        let markets: &BTreeMap<String, String> = &self.config.markets;
        let mut rows = Vec::new();

        for (market_key, model_market) in markets {
            let events = self
                .fetch_market(market_key)
                .await
                .with_context(|| format!("fetching market {}", market_key))?;
            let market_rows = rows_from_events(market_key, model_market, &events);

            tracing::info!(
                market = %market_key,
                events = events.len(),
                rows = market_rows.len(),
                "Fetched odds market"
            );

            rows.extend(market_rows);
            tokio::time::sleep(Duration::from_millis(self.config.throttle_ms)).await;
        }

        Ok(rows)
    }
}
