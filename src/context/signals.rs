//! Context signal store
//!
//! All lookups are case-insensitive and fall back to neutral values when a
//! signal is unknown.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::FeedMods;

fn key(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Team-level mean multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamFactors {
    pub pace: f64,
    pub proe: f64,
    pub off_epa: f64,
}

impl TeamFactors {
    pub const NEUTRAL: TeamFactors = TeamFactors {
        pace: 1.0,
        proe: 1.0,
        off_epa: 1.0,
    };

    pub fn product(&self) -> f64 {
        self.pace * self.proe * self.off_epa
    }
}

/// Injury and usage multipliers for a player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageAdjustment {
    #[serde(default = "neutral")]
    pub snap_adj: f64,
    #[serde(default = "neutral")]
    pub share_adj: f64,
}

fn neutral() -> f64 {
    1.0
}

impl Default for UsageAdjustment {
    fn default() -> Self {
        Self {
            snap_adj: 1.0,
            share_adj: 1.0,
        }
    }
}

/// Game-time weather reading; missing readings never trigger widening
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weather {
    pub temp_f: Option<f64>,
    pub wind_mph: Option<f64>,
}

/// Home and away teams for a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: String,
    pub away: String,
}

/// Context signals for a slate
#[derive(Debug, Clone, Default)]
pub struct ContextSignals {
    pace: HashMap<String, f64>,
    proe: HashMap<String, f64>,
    off_epa: HashMap<String, f64>,
    usage: HashMap<String, UsageAdjustment>,
    low_tier_qb: HashSet<String>,
    top10_pressure: HashSet<String>,
    weather: HashMap<String, Weather>,
    schedule: HashMap<String, Matchup>,
    team_td_rates: HashMap<String, f64>,
    td_shares: HashMap<String, f64>,
}

impl ContextSignals {
    /// Empty (fully neutral) context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pace(&mut self, team: &str, factor: f64) {
        self.pace.insert(key(team), factor);
    }

    pub fn set_proe(&mut self, team: &str, factor: f64) {
        self.proe.insert(key(team), factor);
    }

    pub fn set_off_epa(&mut self, team: &str, factor: f64) {
        self.off_epa.insert(key(team), factor);
    }

    pub fn set_usage(&mut self, player: &str, usage: UsageAdjustment) {
        self.usage.insert(key(player), usage);
    }

    pub fn flag_low_tier_qb(&mut self, player: &str) {
        self.low_tier_qb.insert(key(player));
    }

    pub fn flag_top10_pressure(&mut self, team: &str) {
        self.top10_pressure.insert(key(team));
    }

    pub fn set_weather(&mut self, game_id: &str, weather: Weather) {
        self.weather.insert(key(game_id), weather);
    }

    pub fn set_matchup(&mut self, game_id: &str, home: &str, away: &str) {
        self.schedule.insert(
            key(game_id),
            Matchup {
                home: key(home),
                away: key(away),
            },
        );
    }

    pub fn set_team_td_rate(&mut self, team: &str, rate: f64) {
        self.team_td_rates.insert(key(team), rate);
    }

    pub fn set_td_share(&mut self, player: &str, share: f64) {
        self.td_shares.insert(key(player), share);
    }

    /// Team multipliers, neutral where unknown
    pub fn team_factors(&self, team: &str) -> TeamFactors {
        let team = key(team);
        TeamFactors {
            pace: self.pace.get(&team).copied().unwrap_or(1.0),
            proe: self.proe.get(&team).copied().unwrap_or(1.0),
            off_epa: self.off_epa.get(&team).copied().unwrap_or(1.0),
        }
    }

    pub fn usage(&self, player: &str) -> UsageAdjustment {
        self.usage.get(&key(player)).copied().unwrap_or_default()
    }

    pub fn is_low_tier_qb(&self, player: &str) -> bool {
        self.low_tier_qb.contains(&key(player))
    }

    pub fn is_top10_pressure(&self, team: &str) -> bool {
        self.top10_pressure.contains(&key(team))
    }

    pub fn weather(&self, game_id: &str) -> Weather {
        self.weather.get(&key(game_id)).copied().unwrap_or_default()
    }

    /// The team on the other side of `team` in `game_id`, if the schedule knows it
    pub fn opponent(&self, game_id: &str, team: &str) -> Option<String> {
        let matchup = self.schedule.get(&key(game_id))?;
        let team = key(team);
        if team == matchup.home {
            Some(matchup.away.clone())
        } else if team == matchup.away {
            Some(matchup.home.clone())
        } else {
            None
        }
    }

    pub fn team_td_rate(&self, team: &str) -> Option<f64> {
        self.team_td_rates.get(&key(team)).copied()
    }

    pub fn td_share(&self, player: &str) -> Option<f64> {
        self.td_shares.get(&key(player)).copied()
    }

    /// Layer feed-derived signals on top of this context.
    ///
    /// Values already present win over feed values, so hand-curated inputs
    /// are never overwritten by a public feed.
    pub fn merge_feeds(&mut self, mods: FeedMods) {
        for (team, factor) in mods.pace {
            self.pace.entry(key(&team)).or_insert(factor);
        }
        for (team, factor) in mods.proe {
            self.proe.entry(key(&team)).or_insert(factor);
        }
        for (team, factor) in mods.off_epa {
            self.off_epa.entry(key(&team)).or_insert(factor);
        }
        self.low_tier_qb
            .extend(mods.low_tier_qb.iter().map(|p| key(p)));
        self.top10_pressure
            .extend(mods.top10_pressure.iter().map(|t| key(t)));
    }
}

/// Context section of a slate snapshot
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextRecord {
    pub team_factors: TeamFactorRecord,
    pub usage: Vec<UsageRecord>,
    pub low_tier_qb: Vec<String>,
    pub top10_pressure: Vec<String>,
    pub weather: Vec<WeatherRecord>,
    pub schedule: Vec<ScheduleRecord>,
    pub team_td_rates: HashMap<String, f64>,
    pub td_shares: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TeamFactorRecord {
    pub pace: HashMap<String, f64>,
    pub proe: HashMap<String, f64>,
    pub off_epa: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UsageRecord {
    pub player: String,
    #[serde(flatten)]
    pub adjustment: UsageAdjustment,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherRecord {
    pub game_id: String,
    #[serde(flatten)]
    pub weather: Weather,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleRecord {
    pub game_id: String,
    pub home: String,
    pub away: String,
}

impl From<ContextRecord> for ContextSignals {
    fn from(record: ContextRecord) -> Self {
        let mut ctx = ContextSignals::new();
        for (team, f) in &record.team_factors.pace {
            ctx.set_pace(team, *f);
        }
        for (team, f) in &record.team_factors.proe {
            ctx.set_proe(team, *f);
        }
        for (team, f) in &record.team_factors.off_epa {
            ctx.set_off_epa(team, *f);
        }
        for usage in &record.usage {
            ctx.set_usage(&usage.player, usage.adjustment);
        }
        for player in &record.low_tier_qb {
            ctx.flag_low_tier_qb(player);
        }
        for team in &record.top10_pressure {
            ctx.flag_top10_pressure(team);
        }
        for w in &record.weather {
            ctx.set_weather(&w.game_id, w.weather);
        }
        for s in &record.schedule {
            ctx.set_matchup(&s.game_id, &s.home, &s.away);
        }
        for (team, rate) in &record.team_td_rates {
            ctx.set_team_td_rate(team, *rate);
        }
        for (player, share) in &record.td_shares {
            ctx.set_td_share(player, *share);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_defaults() {
        let ctx = ContextSignals::new();
        assert_eq!(ctx.team_factors("KC"), TeamFactors::NEUTRAL);
        assert_eq!(ctx.usage("Anyone"), UsageAdjustment::default());
        assert!(!ctx.is_low_tier_qb("Anyone"));
        assert!(!ctx.is_top10_pressure("KC"));
        assert_eq!(ctx.weather("g1"), Weather::default());
        assert_eq!(ctx.opponent("g1", "KC"), None);
        assert_eq!(ctx.team_td_rate("KC"), None);
    }

    #[test]
    fn test_lookups_ignore_case() {
        let mut ctx = ContextSignals::new();
        ctx.set_pace("kc", 1.04);
        ctx.flag_low_tier_qb("Joe Backup");
        ctx.set_matchup("BUF@KC", "kc", "buf");

        assert_eq!(ctx.team_factors("KC").pace, 1.04);
        assert!(ctx.is_low_tier_qb("JOE BACKUP"));
        assert_eq!(ctx.opponent("buf@kc", "KC"), Some("BUF".to_string()));
        assert_eq!(ctx.opponent("BUF@KC", "buf"), Some("KC".to_string()));
        assert_eq!(ctx.opponent("BUF@KC", "NYJ"), None);
    }

    #[test]
    fn test_team_factor_product() {
        let factors = TeamFactors {
            pace: 1.1,
            proe: 0.9,
            off_epa: 1.05,
        };
        assert!((factors.product() - 1.1 * 0.9 * 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_merge_feeds_keeps_existing_values() {
        let mut ctx = ContextSignals::new();
        ctx.set_pace("KC", 1.2);

        let mut mods = FeedMods::default();
        mods.pace.insert("KC".to_string(), 0.9);
        mods.pace.insert("BUF".to_string(), 1.03);
        mods.low_tier_qb.insert("JOE BACKUP".to_string());
        ctx.merge_feeds(mods);

        assert_eq!(ctx.team_factors("KC").pace, 1.2);
        assert_eq!(ctx.team_factors("BUF").pace, 1.03);
        assert!(ctx.is_low_tier_qb("joe backup"));
    }

    #[test]
    fn test_from_record() {
        let record: ContextRecord = serde_json::from_str(
            r#"{
                "team_factors": {"pace": {"KC": 1.03}, "off_epa": {"KC": 1.05}},
                "usage": [{"player": "A", "snap_adj": 0.8}],
                "low_tier_qb": ["QB B"],
                "top10_pressure": ["BUF"],
                "weather": [{"game_id": "BUF@KC", "temp_f": 20.0}],
                "schedule": [{"game_id": "BUF@KC", "home": "KC", "away": "BUF"}],
                "td_shares": {"A": 0.25}
            }"#,
        )
        .unwrap();
        let ctx = ContextSignals::from(record);

        let factors = ctx.team_factors("KC");
        assert_eq!(factors.pace, 1.03);
        assert_eq!(factors.proe, 1.0);
        assert_eq!(factors.off_epa, 1.05);
        assert_eq!(ctx.usage("A").snap_adj, 0.8);
        assert_eq!(ctx.usage("A").share_adj, 1.0);
        assert!(ctx.is_low_tier_qb("QB B"));
        assert!(ctx.is_top10_pressure("BUF"));
        assert_eq!(ctx.weather("BUF@KC").temp_f, Some(20.0));
        assert_eq!(ctx.weather("BUF@KC").wind_mph, None);
        assert_eq!(ctx.opponent("BUF@KC", "KC"), Some("BUF".to_string()));
        assert_eq!(ctx.td_share("a"), Some(0.25));
    }
}
