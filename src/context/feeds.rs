//! Public stat feed adapter
//!
//! Feeds are published as CSV tables, with the pandas "split" JSON layout
//! (`{"columns": [...], "data": [[...], ...]}`) accepted as an alternative.
//! Headers vary between mirrors, so canonical fields are resolved with
//! [`resolve_column`]. A feed that fails to load contributes nothing and the
//! pipeline stays neutral.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

use super::columns::{self, resolve_column, ColumnRule};
use crate::config::FeedsConfig;

/// Number of pass-rush units flagged as top tier
const TOP_PRESSURE_COUNT: usize = 10;
const SD_FLOOR: f64 = 1e-6;

/// Feed loading errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed returned status {status}: {url}")]
    Status { status: u16, url: String },
    #[error("Malformed feed table: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Malformed CSV feed: {0}")]
    Csv(#[from] csv::Error),
}

/// A feed table with ordered headers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedTable {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl FeedTable {
    pub fn from_json(text: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Headers from the first record; every cell is kept as text
    pub fn from_csv(text: &str) -> Result<Self, FeedError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns = reader.headers()?.iter().map(str::to_string).collect();
        let data = reader
            .records()
            .map(|record| {
                record.map(|r| r.iter().map(|cell| Value::String(cell.to_string())).collect())
            })
            .collect::<Result<Vec<Vec<Value>>, csv::Error>>()?;

        Ok(Self { columns, data })
    }

    /// Decode a feed body, picking the parser from the content type or the
    /// URL extension and falling back to CSV
    pub fn parse(text: &str, content_type: Option<&str>, url: &str) -> Result<Self, FeedError> {
        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        let is_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
            || path.ends_with(".json")
            || text.trim_start().starts_with('{');

        if is_json {
            Self::from_json(text)
        } else {
            Self::from_csv(text)
        }
    }

    /// (text, number) pairs for two resolved columns; rows with a missing
    /// cell in either column are dropped
    fn pairs(&self, key_rules: &[ColumnRule], value_rules: &[ColumnRule]) -> Vec<(String, f64)> {
        let (Some(k), Some(v)) = (
            resolve_column(&self.columns, key_rules),
            resolve_column(&self.columns, value_rules),
        ) else {
            return Vec::new();
        };

        self.data
            .iter()
            .filter_map(|row| {
                let name = text_cell(row.get(k)?)?;
                let value = number_cell(row.get(v)?)?;
                Some((name, value))
            })
            .collect()
    }
}

fn text_cell(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then(|| text.to_uppercase())
}

fn number_cell(value: &Value) -> Option<f64> {
    let number: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Population mean and standard deviation (sd floored)
fn mean_sd(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt().max(SD_FLOOR))
}

/// Signals derived from public feeds
#[derive(Debug, Clone, Default)]
pub struct FeedMods {
    pub pace: HashMap<String, f64>,
    pub proe: HashMap<String, f64>,
    pub off_epa: HashMap<String, f64>,
    pub low_tier_qb: HashSet<String>,
    pub top10_pressure: HashSet<String>,
}

impl FeedMods {
    /// Map a team metric to multipliers centered on 1.0: `1 + z * scale`
    pub fn team_factors(table: &FeedTable, value_rules: &[ColumnRule], scale: f64) -> HashMap<String, f64> {
        let pairs = table.pairs(columns::TEAM, value_rules);
        if pairs.is_empty() {
            return HashMap::new();
        }
        let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
        let (mean, sd) = mean_sd(&values);

        pairs
            .into_iter()
            .map(|(team, v)| (team, 1.0 + (v - mean) / sd * scale))
            .collect()
    }

    /// Quarterbacks whose EPA sits at least half a standard deviation below the mean
    pub fn low_tier_qbs(table: &FeedTable) -> HashSet<String> {
        let pairs = table.pairs(columns::QB_NAME, columns::QB_EPA);
        if pairs.is_empty() {
            return HashSet::new();
        }
        let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
        let (mean, sd) = mean_sd(&values);
        let cut = mean - 0.5 * sd;

        pairs
            .into_iter()
            .filter(|(_, epa)| *epa <= cut)
            .map(|(name, _)| name)
            .collect()
    }

    /// The ten highest pressure-rate defenses; ties keep table order
    pub fn top_pressure_teams(table: &FeedTable) -> HashSet<String> {
        let mut pairs = table.pairs(columns::TEAM, columns::PRESSURE);
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
            .into_iter()
            .take(TOP_PRESSURE_COUNT)
            .map(|(team, _)| team)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pace.is_empty()
            && self.proe.is_empty()
            && self.off_epa.is_empty()
            && self.low_tier_qb.is_empty()
            && self.top10_pressure.is_empty()
    }
}

/// Fetches feed tables over HTTP with retries
pub struct FeedLoader {
    config: FeedsConfig,
    client: Client,
}

impl FeedLoader {
    pub fn new(config: FeedsConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Fetch one feed table, retrying with a growing pause
    pub async fn fetch_table(&self, url: &str) -> Result<FeedTable, FeedError> {
        let attempts = self.config.retries.max(1);
        let mut last_err = None;

        for attempt in 0..attempts {
            match self.fetch_once(url).await {
                Ok(table) => return Ok(table),
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        attempts,
                        error = %e,
                        "Feed fetch failed"
                    );
                    last_err = Some(e);
                    if attempt + 1 < attempts {
                        tokio::time::sleep(Duration::from_secs(1 + attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(FeedError::Status {
            status: 0,
            url: url.to_string(),
        }))
    }

    async fn fetch_once(&self, url: &str) -> Result<FeedTable, FeedError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;
        FeedTable::parse(&text, content_type.as_deref(), url)
    }

    async fn optional_table(&self, url: Option<&str>) -> Option<FeedTable> {
        let url = url.filter(|u| !u.trim().is_empty())?;
        match self.fetch_table(url).await {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Feed unavailable, using neutral values");
                None
            }
        }
    }

    /// Load every configured feed; unavailable feeds are skipped
    pub async fn load(&self) -> FeedMods {
        let scale = self.config.factor_scale;
        let mut mods = FeedMods::default();

        if let Some(t) = self.optional_table(self.config.team_pace.as_deref()).await {
            mods.pace = FeedMods::team_factors(&t, columns::PACE, scale);
        }
        if let Some(t) = self.optional_table(self.config.team_proe.as_deref()).await {
            mods.proe = FeedMods::team_factors(&t, columns::PROE, scale);
        }
        if let Some(t) = self.optional_table(self.config.team_epa.as_deref()).await {
            mods.off_epa = FeedMods::team_factors(&t, columns::OFF_EPA, scale);
        }
        if let Some(t) = self.optional_table(self.config.rbsdm_qb.as_deref()).await {
            mods.low_tier_qb = FeedMods::low_tier_qbs(&t);
        }
        if let Some(t) = self.optional_table(self.config.team_pressure.as_deref()).await {
            mods.top10_pressure = FeedMods::top_pressure_teams(&t);
        }

        tracing::info!(
            pace_teams = mods.pace.len(),
            proe_teams = mods.proe.len(),
            epa_teams = mods.off_epa.len(),
            low_tier_qbs = mods.low_tier_qb.len(),
            pressure_teams = mods.top10_pressure.len(),
            "Loaded feed modifiers"
        );

        mods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_factors_centered_on_one() {
        let table = FeedTable::from_json(
            r#"{"columns": ["team", "pace"],
                "data": [["kc", 60.0], ["BUF", 64.0], ["NYJ", null], ["MIA", "62"]]}"#,
        )
        .unwrap();

        let factors = FeedMods::team_factors(&table, columns::PACE, 0.05);
        assert_eq!(factors.len(), 3);
        // mean 62, population sd sqrt(8/3)
        let sd = (8.0f64 / 3.0).sqrt();
        assert!((factors["KC"] - (1.0 - 2.0 / sd * 0.05)).abs() < 1e-12);
        assert!((factors["BUF"] - (1.0 + 2.0 / sd * 0.05)).abs() < 1e-12);
        assert!((factors["MIA"] - 1.0).abs() < 1e-12);
        assert!(!factors.contains_key("NYJ"));
    }

    #[test]
    fn test_constant_metric_is_neutral() {
        let table = FeedTable::from_json(
            r#"{"columns": ["abbr", "proe"], "data": [["KC", 0.02], ["BUF", 0.02]]}"#,
        )
        .unwrap();
        let factors = FeedMods::team_factors(&table, columns::PROE, 0.05);
        assert!((factors["KC"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unresolvable_columns_yield_nothing() {
        let table = FeedTable::from_json(r#"{"columns": ["club", "tempo"], "data": [["KC", 1]]}"#)
            .unwrap();
        assert!(FeedMods::team_factors(&table, columns::PACE, 0.05).is_empty());
    }

    #[test]
    fn test_low_tier_qbs() {
        let table = FeedTable::from_json(
            r#"{"columns": ["player_name", "epa_per_play"],
                "data": [["Ace", 0.25], ["Solid", 0.10], ["Okay", 0.05], ["Backup", -0.20]]}"#,
        )
        .unwrap();
        let low = FeedMods::low_tier_qbs(&table);
        assert_eq!(low.len(), 1);
        assert!(low.contains("BACKUP"));
    }

    #[test]
    fn test_top_pressure_teams() {
        let rows: Vec<String> = (0..14)
            .map(|i| format!(r#"["T{}", {}]"#, i, i as f64 / 100.0))
            .collect();
        let json = format!(
            r#"{{"columns": ["team", "pressure_rate"], "data": [{}]}}"#,
            rows.join(",")
        );
        let table = FeedTable::from_json(&json).unwrap();
        let top = FeedMods::top_pressure_teams(&table);

        assert_eq!(top.len(), 10);
        assert!(top.contains("T13"));
        assert!(top.contains("T4"));
        assert!(!top.contains("T3"));
    }

    #[test]
    fn test_malformed_table() {
        assert!(FeedTable::from_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_csv_team_pace() {
        let table = FeedTable::from_csv(
            "season,team,pace\n2024,kc,60.0\n2024,BUF,64.0\n2024,NYJ,\n2024, MIA ,62\n",
        )
        .unwrap();
        assert_eq!(table.columns, vec!["season", "team", "pace"]);
        assert_eq!(table.data.len(), 4);

        let factors = FeedMods::team_factors(&table, columns::PACE, 0.05);
        assert_eq!(factors.len(), 3);
        let sd = (8.0f64 / 3.0).sqrt();
        assert!((factors["KC"] - (1.0 - 2.0 / sd * 0.05)).abs() < 1e-12);
        assert!((factors["BUF"] - (1.0 + 2.0 / sd * 0.05)).abs() < 1e-12);
        assert!((factors["MIA"] - 1.0).abs() < 1e-12);
        assert!(!factors.contains_key("NYJ"));
    }

    #[test]
    fn test_csv_low_tier_qbs() {
        let table = FeedTable::from_csv(
            "player_name,epa_per_play\nAce,0.25\nSolid,0.10\nOkay,0.05\nBackup,-0.20\n",
        )
        .unwrap();
        let low = FeedMods::low_tier_qbs(&table);
        assert_eq!(low.len(), 1);
        assert!(low.contains("BACKUP"));
    }

    #[test]
    fn test_parse_picks_decoder() {
        let csv = "team,pace\nKC,60\n";
        let json = r#"{"columns": ["team", "pace"], "data": [["KC", 60]]}"#;

        let t = FeedTable::parse(csv, Some("text/csv; charset=utf-8"), "https://x.org/pace").unwrap();
        assert_eq!(t.columns, vec!["team", "pace"]);
        let t = FeedTable::parse(csv, None, "https://x.org/team_pace.csv?raw=1").unwrap();
        assert_eq!(t.data.len(), 1);

        let t = FeedTable::parse(json, Some("application/json"), "https://x.org/pace").unwrap();
        assert_eq!(t.data.len(), 1);
        let t = FeedTable::parse(json, None, "https://x.org/pace.json").unwrap();
        assert_eq!(t.columns, vec!["team", "pace"]);
        let t = FeedTable::parse(json, Some("text/plain"), "https://x.org/pace").unwrap();
        assert_eq!(t.data.len(), 1);
    }
}
